use crate::common::{test_config_builder, token_from};
use simple_captcha::{
    CacheCodeStore, CookieCodeStore, SessionCodeStore, StoreReceipt, VerificationCodeStore,
};
use std::sync::Arc;
use std::time::Duration;

fn server_side_stores(reusable: bool) -> Vec<Box<dyn VerificationCodeStore>> {
    let config = test_config_builder().code_reusable(reusable).build().unwrap();
    vec![
        Box::new(CacheCodeStore::new(&config)),
        Box::new(SessionCodeStore::new(&config)),
    ]
}

#[test]
fn test_backends_are_interchangeable() {
    for store in server_side_stores(false) {
        store.save("k1", "AB3D9", Duration::from_secs(60)).unwrap();
        assert_eq!(
            store.save("k1", "AB3D9", Duration::from_secs(60)).unwrap(),
            StoreReceipt::ServerSide
        );
        assert!(store.validate("k1", "AB3D9", true).unwrap());
        assert!(!store.validate("k1", "AB3D9", true).unwrap());
    }
}

#[test]
fn test_invalidate_across_backends() {
    for store in server_side_stores(true) {
        store.save("k1", "AB3D9", Duration::from_secs(60)).unwrap();
        store.invalidate("k1").unwrap();
        assert!(!store.validate("k1", "AB3D9", true).unwrap());
    }
}

#[test]
fn test_expiry_across_backends() {
    let config = test_config_builder().build().unwrap();
    let cookie = CookieCodeStore::new(&config).unwrap();

    let mut stores: Vec<(Box<dyn VerificationCodeStore>, bool)> = server_side_stores(false)
        .into_iter()
        .map(|s| (s, false))
        .collect();
    stores.push((Box::new(cookie), true));

    for (store, key_is_token) in stores {
        let receipt = store.save("k1", "AB3D9", Duration::from_millis(20)).unwrap();
        let key = if key_is_token {
            token_from(&receipt)
        } else {
            "k1".to_string()
        };

        std::thread::sleep(Duration::from_millis(60));
        assert!(!store.validate(&key, "AB3D9", true).unwrap());
    }
}

#[test]
fn test_concurrent_single_use_has_one_winner() {
    for store in server_side_stores(false) {
        let store: Arc<dyn VerificationCodeStore> = Arc::from(store);
        store.save("k1", "AB3D9", Duration::from_secs(60)).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.validate("k1", "AB3D9", true).unwrap())
            })
            .collect();

        let wins: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();
        assert_eq!(wins, 1, "exactly one concurrent verification may succeed");
    }
}

#[test]
fn test_concurrent_issue_and_verify_different_keys() {
    let config = test_config_builder().build().unwrap();
    let store = Arc::new(CacheCodeStore::new(&config));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let key = format!("client-{i}");
                store.save(&key, "AB3D9", Duration::from_secs(60)).unwrap();
                assert!(store.validate(&key, "AB3D9", true).unwrap());
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn test_cookie_store_requires_configured_secret() {
    let config = simple_captcha::CaptchaConfig::builder().build().unwrap();
    assert!(CookieCodeStore::new(&config).is_err());
}
