//! Unit tests for lc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{PersonId, SegmentId, ZoneId};

    #[test]
    fn ordering() {
        assert!(PersonId(0) < PersonId(1));
        assert!(ZoneId(100) > ZoneId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(PersonId::INVALID.0, u32::MAX);
        assert_eq!(ZoneId::INVALID.0, u32::MAX);
        assert_eq!(SegmentId::INVALID.0, u16::MAX);
        assert_eq!(ZoneId::default(), ZoneId::NONE);
    }

    #[test]
    fn no_destination_exports_as_minus_one() {
        assert_eq!(ZoneId::NONE.to_signed(), -1);
        assert_eq!(ZoneId(17).to_signed(), 17);
    }

    #[test]
    fn display() {
        assert_eq!(ZoneId(7).to_string(), "ZoneId(7)");
    }
}

#[cfg(test)]
mod rng {
    use crate::{ChooserRng, PersonId, RandomStreams, StreamKey};

    #[test]
    fn deterministic_same_seed() {
        let key = StreamKey::from_label("workplace_location.i1.sample.work_low");
        let mut r1 = ChooserRng::new(12345, PersonId(3), key);
        let mut r2 = ChooserRng::new(12345, PersonId(3), key);
        for _ in 0..100 {
            assert_eq!(r1.uniform(), r2.uniform());
        }
    }

    #[test]
    fn streams_differ_by_label() {
        let a = StreamKey::from_label("school_location.i1.sample.k12");
        let b = StreamKey::from_label("school_location.i2.sample.k12");
        assert_ne!(a, b);

        let streams = RandomStreams::new(1);
        let x = streams.chooser(PersonId(0), a).uniform();
        let y = streams.chooser(PersonId(0), b).uniform();
        assert_ne!(x, y, "iterations must draw from different streams");
    }

    #[test]
    fn different_persons_differ() {
        let key = StreamKey::from_label("x");
        let a = ChooserRng::new(1, PersonId(0), key).uniform();
        let b = ChooserRng::new(1, PersonId(1), key).uniform();
        assert_ne!(a, b);
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut rng = ChooserRng::new(0, PersonId(0), StreamKey::from_label("u"));
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }
}

#[cfg(test)]
mod segments {
    use std::collections::BTreeMap;

    use crate::{SegmentId, Segments};

    fn codes(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn sorted_by_name() {
        let segs = Segments::from_codes(&codes(&[("work_low", 1), ("work_high", 3), ("work_med", 2)]))
            .unwrap();
        assert_eq!(segs.names(), ["work_high", "work_low", "work_med"]);
        assert_eq!(segs.get(SegmentId(0)).unwrap().code, 3);
        assert_eq!(segs.by_code(1).unwrap().name, "work_low");
        assert!(segs.by_code(9).is_none());
    }

    #[test]
    fn duplicate_codes_rejected() {
        assert!(Segments::from_codes(&codes(&[("a", 1), ("b", 1)])).is_err());
    }
}

#[cfg(test)]
mod settings {
    use crate::{LocationSettings, ShadowPriceMethod, ShadowPriceSettings, TourPurpose};

    const WORKPLACE_JSON: &str = r#"{
        "sample_spec": "workplace_location_sample.csv",
        "spec": "workplace_location.csv",
        "logsum_settings": "logsum.json",
        "size_terms": "size_terms.csv",
        "model_selector": "workplace",
        "dest_choice_column_name": "workplace_taz",
        "chooser_segment_column_name": "income_segment",
        "chooser_filter_column_name": "is_worker",
        "segment_ids": {"work_low": 1, "work_high": 2},
        "logsum_tour_purpose": "work",
        "shadow_pricing": {"use_shadow_pricing": true, "method": "daysim"}
    }"#;

    #[test]
    fn defaults_fill_missing_fields() {
        let s: LocationSettings = serde_json::from_str(WORKPLACE_JSON).unwrap();
        assert_eq!(s.sample_size, 30);
        assert_eq!(s.shadow_pricing.max_iterations, 5);
        assert_eq!(s.shadow_pricing.method, ShadowPriceMethod::Daysim);
        assert_eq!(s.logsum_tour_purpose, TourPurpose::Single("work".into()));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn per_segment_purpose() {
        let p: TourPurpose =
            serde_json::from_str(r#"{"university": "univ", "k12": "school"}"#).unwrap();
        assert_eq!(p.for_segment("k12").unwrap(), "school");
        assert!(p.for_segment("preschool").is_err());
    }

    #[test]
    fn disabled_shadow_pricing_runs_once() {
        let mut s = ShadowPriceSettings::default();
        s.max_iterations = 10;
        assert_eq!(s.effective_max_iterations(), 1);
        s.use_shadow_pricing = true;
        assert_eq!(s.effective_max_iterations(), 10);
    }

    #[test]
    fn bad_damping_rejected() {
        let s = ShadowPriceSettings { damping_factor: 0.0, ..Default::default() };
        assert!(s.validate().is_err());
    }
}
