use crate::common::{cache_manager, test_config_builder, token_from, TEST_SECRET};
use simple_captcha::{CaptchaManager, CookieCodeStore, CookieCrypto, SessionCodeStore};
use std::sync::Arc;

#[test]
fn test_issue_then_verify_correct_code() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").expect("code must be stored");

    assert!(manager.verify("client-1", &code).unwrap());
}

#[test]
fn test_wrong_answer_fails() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").unwrap();
    let wrong = format!("{code}X");

    assert!(!manager.verify("client-1", &wrong).unwrap());
}

#[test]
fn test_single_use_code_consumed_on_success() {
    let config = Arc::new(test_config_builder().code_reusable(false).build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").unwrap();

    assert!(manager.verify("client-1", &code).unwrap());
    assert!(!manager.verify("client-1", &code).unwrap());
}

#[test]
fn test_reusable_code_survives_repeated_verification() {
    let config = Arc::new(test_config_builder().code_reusable(true).build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").unwrap();

    for _ in 0..3 {
        assert!(manager.verify("client-1", &code).unwrap());
    }
}

#[test]
fn test_verify_never_issued_key() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let (manager, _) = cache_manager(config);

    assert!(!manager.verify("never-issued", "AB3D9").unwrap());
}

#[test]
fn test_reissue_overwrites_previous_code() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let first = store.stored_code("client-1").unwrap();
    manager.issue("client-1").unwrap();
    let second = store.stored_code("client-1").unwrap();

    // The old code is gone even if the two random codes happen to collide.
    if first != second {
        assert!(!manager.verify("client-1", &first).unwrap());
    }
    assert!(manager.verify("client-1", &second).unwrap());
}

#[test]
fn test_case_insensitive_verification() {
    let config = Arc::new(test_config_builder().case_sensitive(false).build().unwrap());
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").unwrap();

    assert!(manager.verify("client-1", &code.to_lowercase()).unwrap());
}

#[test]
fn test_case_sensitive_verification() {
    let config = Arc::new(
        test_config_builder()
            .case_sensitive(true)
            .include_numbers(false)
            .exclude_chars("")
            .build()
            .unwrap(),
    );
    let (manager, store) = cache_manager(config);

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").unwrap();

    assert!(!manager.verify("client-1", &code.to_lowercase()).unwrap());
    assert!(manager.verify("client-1", &code).unwrap());
}

#[test]
fn test_session_backend_lifecycle() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let store = SessionCodeStore::new(&config);
    let manager = CaptchaManager::new(config, Arc::new(store.clone())).unwrap();

    manager.issue("client-1").unwrap();
    let code = store.stored_code("client-1").unwrap();

    assert!(manager.verify("client-1", &code).unwrap());
    assert!(!manager.verify("client-1", &code).unwrap());
}

#[test]
fn test_cookie_backend_end_to_end() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let store = Arc::new(CookieCodeStore::new(&config).unwrap());
    let manager = CaptchaManager::new(config, store).unwrap();

    let challenge = manager.issue("client-1").unwrap();
    let token = token_from(&challenge.receipt);

    // Recover the issued plaintext the way only the key holder could.
    let crypto = CookieCrypto::new(TEST_SECRET.as_bytes().try_into().unwrap());
    let payload = String::from_utf8(crypto.decrypt(&token).unwrap()).unwrap();
    let (code, _expiry) = payload.rsplit_once('|').unwrap();

    // For the cookie backend the token itself is the lookup key.
    assert!(manager.verify(&token, code).unwrap());
    assert!(!manager.verify(&token, "WRONG").unwrap());
}

#[test]
fn test_cookie_backend_rejects_tampered_token() {
    let config = Arc::new(test_config_builder().build().unwrap());
    let store = Arc::new(CookieCodeStore::new(&config).unwrap());
    let manager = CaptchaManager::new(config, store).unwrap();

    let challenge = manager.issue("client-1").unwrap();
    let mut token = token_from(&challenge.receipt);
    token.insert(4, 'x');

    assert!(!manager.verify(&token, "AB3D9").unwrap());
}
