use crate::{
    CampaignRegistry, CampaignWindow, CouponState, Error, MAX_CODE_LENGTH, ThreadRandom,
    TimeSource,
};
use chrono::{DateTime, Duration, Local, TimeZone};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::scope;

/// A clock shared between the test and the registry, moved by hand.
#[derive(Clone)]
struct MockClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl MockClock {
    fn at(now: DateTime<Local>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap() = now;
    }
}

impl TimeSource for MockClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn one_hour_around(now: DateTime<Local>) -> CampaignWindow {
    CampaignWindow::new(now - Duration::hours(1), now + Duration::hours(1)).unwrap()
}

fn registry() -> (CampaignRegistry<ThreadRandom, MockClock>, MockClock) {
    let clock = MockClock::at(noon());
    let registry = CampaignRegistry::new(MAX_CODE_LENGTH, ThreadRandom, clock.clone());
    (registry, clock)
}

#[test]
fn issue_exhaust_and_redeem_scenario() {
    let (registry, _clock) = registry();
    registry
        .create_campaign("c1", one_hour_around(noon()), 3)
        .unwrap();

    let codes: Vec<String> = (0..3)
        .map(|_| registry.publish_coupon("c1").unwrap().code().to_string())
        .collect();
    let distinct: HashSet<&String> = codes.iter().collect();
    assert_eq!(distinct.len(), 3);

    let err = registry.publish_coupon("c1").unwrap_err();
    assert_eq!(
        err,
        Error::CouponsExhausted {
            campaign_id: "c1".to_string()
        }
    );
    assert!(err.to_string().contains("no more coupons"));

    let used = registry.use_coupon("c1", &codes[0]).unwrap();
    assert_eq!(used.state(), CouponState::Used);

    let err = registry.use_coupon("c1", &codes[0]).unwrap_err();
    assert!(matches!(err, Error::CouponAlreadyUsed { .. }));
    assert!(err.to_string().contains("already been used"));
}

#[test]
fn duplicate_campaign_is_rejected_and_left_untouched() {
    let (registry, _clock) = registry();
    registry
        .create_campaign("c1", one_hour_around(noon()), 2)
        .unwrap();
    let issued = registry.publish_coupon("c1").unwrap();
    let before = registry.campaign_info("c1").unwrap();

    let err = registry
        .create_campaign("c1", one_hour_around(noon() + Duration::days(7)), 50)
        .unwrap_err();
    assert_eq!(
        err,
        Error::CampaignExists {
            campaign_id: "c1".to_string()
        }
    );

    let after = registry.campaign_info("c1").unwrap();
    assert_eq!(before, after);
    assert_eq!(after.max_coupons, 2);
    assert_eq!(after.issued, 1);
    assert!(after.coupon_codes.iter().any(|c| c == issued.code()));
}

#[test]
fn unknown_campaign_is_reported_by_every_operation() {
    let (registry, _clock) = registry();
    let not_found = Error::CampaignNotFound {
        campaign_id: "ghost".to_string(),
    };

    assert_eq!(registry.publish_coupon("ghost").unwrap_err(), not_found);
    assert_eq!(registry.use_coupon("ghost", "code").unwrap_err(), not_found);
    assert_eq!(registry.campaign_info("ghost").unwrap_err(), not_found);
}

#[test]
fn issue_honors_the_campaign_window() {
    let (registry, clock) = registry();
    let window = one_hour_around(noon());
    registry.create_campaign("c1", window, 5).unwrap();

    let not_active = Error::CampaignNotActive {
        campaign_id: "c1".to_string(),
    };

    clock.set(window.starts_at() - Duration::seconds(1));
    assert_eq!(registry.publish_coupon("c1").unwrap_err(), not_active);

    clock.set(window.expires_at() + Duration::seconds(1));
    assert_eq!(registry.publish_coupon("c1").unwrap_err(), not_active);

    clock.set(noon());
    assert!(registry.publish_coupon("c1").is_ok());
    assert_eq!(registry.campaign_info("c1").unwrap().issued, 1);
}

#[test]
fn redeem_after_expiry_is_rejected() {
    let (registry, clock) = registry();
    let window = one_hour_around(noon());
    registry.create_campaign("c1", window, 1).unwrap();
    let coupon = registry.publish_coupon("c1").unwrap();

    clock.set(window.expires_at() + Duration::minutes(1));
    assert!(matches!(
        registry.use_coupon("c1", coupon.code()),
        Err(Error::CouponNotActive { .. })
    ));

    clock.set(window.expires_at());
    assert!(registry.use_coupon("c1", coupon.code()).is_ok());
}

#[test]
fn redeem_never_issued_or_unknown_coupon() {
    let (registry, _clock) = registry();
    registry
        .create_campaign("c1", one_hour_around(noon()), 1)
        .unwrap();
    let code = registry.campaign_info("c1").unwrap().coupon_codes[0].clone();

    assert!(matches!(
        registry.use_coupon("c1", &code),
        Err(Error::CouponNotPublished { .. })
    ));
    assert!(matches!(
        registry.use_coupon("c1", "no-such-code"),
        Err(Error::CouponNotFound { .. })
    ));
}

#[test]
fn info_lists_every_generated_code() {
    let (registry, _clock) = registry();
    let window = one_hour_around(noon());
    registry.create_campaign("c1", window, 4).unwrap();
    let issued = registry.publish_coupon("c1").unwrap();

    let info = registry.campaign_info("c1").unwrap();
    assert_eq!(info.campaign_id, "c1");
    assert_eq!(info.window, window);
    assert_eq!(info.coupon_codes.len(), 4);
    assert!(info.coupon_codes.windows(2).all(|w| w[0] < w[1]));
    assert!(info.coupon_codes.iter().any(|c| c == issued.code()));
    assert_eq!(info.issued, 1);
    assert_eq!(info.redeemed, 0);
}

#[test]
fn campaigns_are_listed_and_counted() {
    let (registry, _clock) = registry();
    assert!(registry.is_empty());

    for id in ["b", "a", "c"] {
        registry
            .create_campaign(id, one_hour_around(noon()), 1)
            .unwrap();
    }

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.campaign_ids(), vec!["a", "b", "c"]);
}

#[test]
fn oversized_campaign_fails_without_registering() {
    let (registry, _clock) = registry();
    let err = registry
        .create_campaign("huge", one_hour_around(noon()), usize::MAX)
        .unwrap_err();
    assert!(matches!(err, Error::CodeGeneration { .. }), "{err}");
    assert!(registry.is_empty());
    assert!(matches!(
        registry.publish_coupon("huge"),
        Err(Error::CampaignNotFound { .. })
    ));
}

#[test]
fn racing_creations_of_one_id_have_a_single_winner() {
    const THREADS: usize = 8;

    let (registry, _clock) = registry();
    let winners = AtomicUsize::new(0);

    scope(|s| {
        for i in 0..THREADS {
            let registry = &registry;
            let winners = &winners;
            s.spawn(move || {
                match registry.create_campaign("shared", one_hour_around(noon()), 10 + i) {
                    Ok(()) => {
                        winners.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => assert!(matches!(err, Error::CampaignExists { .. })),
                }
            });
        }
    });

    assert_eq!(winners.load(Ordering::Relaxed), 1);
    assert_eq!(registry.len(), 1);
    let info = registry.campaign_info("shared").unwrap();
    assert_eq!(info.coupon_codes.len(), info.max_coupons);
}

#[test]
fn concurrent_issuance_across_campaigns_never_oversells() {
    const CAMPAIGNS: usize = 4;
    const COUPONS: usize = 64;
    let threads = num_cpus::get().clamp(2, 16);
    let attempts_per_thread = CAMPAIGNS * COUPONS;

    let (registry, _clock) = registry();
    for c in 0..CAMPAIGNS {
        registry
            .create_campaign(&format!("c{c}"), one_hour_around(noon()), COUPONS)
            .unwrap();
    }

    let issued: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());
    scope(|s| {
        for t in 0..threads {
            let registry = &registry;
            let issued = &issued;
            s.spawn(move || {
                for n in 0..attempts_per_thread {
                    let campaign_id = format!("c{}", (t + n) % CAMPAIGNS);
                    match registry.publish_coupon(&campaign_id) {
                        Ok(coupon) => issued
                            .lock()
                            .unwrap()
                            .push((campaign_id, coupon.code().to_string())),
                        Err(err) => assert!(matches!(err, Error::CouponsExhausted { .. })),
                    }
                }
            });
        }
    });

    let issued = issued.into_inner().unwrap();
    let distinct: HashSet<&(String, String)> = issued.iter().collect();
    assert_eq!(issued.len(), CAMPAIGNS * COUPONS);
    assert_eq!(distinct.len(), issued.len());

    for c in 0..CAMPAIGNS {
        let info = registry.campaign_info(&format!("c{c}")).unwrap();
        assert_eq!(info.issued, COUPONS);
        assert_eq!(info.remaining(), 0);
    }
}

#[test]
fn default_registry_uses_the_system_clock() {
    let registry = CampaignRegistry::default();
    let now = Local::now();
    registry
        .create_campaign("live", one_hour_around(now), 2)
        .unwrap();

    let coupon = registry.publish_coupon("live").unwrap();
    assert_eq!(coupon.code().chars().count(), MAX_CODE_LENGTH);
    registry.use_coupon("live", coupon.code()).unwrap();
}
