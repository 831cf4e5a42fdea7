#![no_main]

use arbitrary::Arbitrary;
use hostup_dns::hostup::ApiOutcome;
use hostup_dns::types::{ZoneDetails, Zones};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Response {
    status: u16,
    body: String,
}

fuzz_target!(|response: Response| {
    let outcome = ApiOutcome::classify(response.status, response.body);
    match (&outcome, response.status) {
        (ApiOutcome::RateLimited(_), 429) => {}
        (ApiOutcome::Success(_) | ApiOutcome::ApiError(_), 200) => {}
        (ApiOutcome::TransportError { .. }, s) if s != 200 && s != 429 => {}
        (o, s) => panic!("status {} classified as {:?}", s, o),
    }

    // decoding arbitrary bodies must fail cleanly, never panic
    let _ = outcome.clone().decode::<Zones>();
    let _ = outcome.decode::<ZoneDetails>();
});
