#![no_main]

use hostup_dns::token::{decode_expiry, Token};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Token::new must agree with decode_expiry on arbitrary strings
    match decode_expiry(data) {
        Ok(exp) => {
            let token = Token::new(data, "").expect("decodable token must construct");
            assert_eq!(token.expiration(), exp);
        }
        Err(_) => assert!(Token::new(data, "").is_err()),
    }
});
