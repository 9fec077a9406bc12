//! Unit tests for lc-data tables and loaders.

#[cfg(test)]
mod population_tests {
    use lc_core::{PersonId, ZoneId};

    use crate::{DataError, Population, PopulationBuilder};

    fn three_persons() -> Population {
        PopulationBuilder::new()
            .person(10, 1)
            .person(11, 2)
            .person(12, 1)
            .column("is_student", vec![1.0, 0.0, 1.0])
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_person_rejected() {
        let result = PopulationBuilder::new().person(1, 1).person(1, 2).build();
        assert!(matches!(result, Err(DataError::DuplicateId { what: "person", id: 1 })));
    }

    #[test]
    fn column_length_checked() {
        let result = PopulationBuilder::new()
            .person(1, 1)
            .column("x", vec![1.0, 2.0])
            .build();
        assert!(matches!(result, Err(DataError::LengthMismatch { .. })));
    }

    #[test]
    fn eligible_rows_follow_filter() {
        let p = three_persons();
        assert_eq!(p.eligible_rows("is_student").unwrap(), vec![0, 2]);
        assert!(p.eligible_rows("is_worker").is_err());
    }

    #[test]
    fn unchosen_persons_get_no_destination() {
        let mut p = three_persons();
        let assigned = p
            .set_destinations("school_taz", [(PersonId(10), ZoneId(5)), (PersonId(12), ZoneId(7))])
            .unwrap();
        assert_eq!(assigned, 2);
        assert_eq!(
            p.destinations("school_taz").unwrap(),
            &[ZoneId(5), ZoneId::NONE, ZoneId(7)]
        );
    }

    #[test]
    fn unknown_person_in_choices_is_error() {
        let mut p = three_persons();
        let result = p.set_destinations("x", [(PersonId(99), ZoneId(1))]);
        assert!(matches!(result, Err(DataError::UnknownPerson(PersonId(99)))));
    }
}

#[cfg(test)]
mod size_term_tests {
    use std::collections::BTreeMap;

    use crate::{DataError, SizeTermRow, SizeTermSpec, ZoneTableBuilder};

    fn spec() -> SizeTermSpec {
        SizeTermSpec::new(vec![SizeTermRow {
            model_selector: "workplace".into(),
            segment:        "work_low".into(),
            coefficients:   BTreeMap::from([("EMP".to_string(), 0.5), ("RET".to_string(), 2.0)]),
        }])
    }

    #[test]
    fn weighted_sum_of_land_use_columns() {
        let zones = ZoneTableBuilder::new()
            .zones([1, 2, 3])
            .column("EMP", vec![10.0, 0.0, 4.0])
            .column("RET", vec![1.0, 0.0, 0.0])
            .build()
            .unwrap();
        let sizes = spec().dest_size_terms(&zones, "workplace", "work_low").unwrap();
        assert_eq!(sizes, vec![7.0, 0.0, 2.0]);
    }

    #[test]
    fn unknown_segment_is_error() {
        let zones = ZoneTableBuilder::new().zones([1]).build().unwrap();
        let result = spec().dest_size_terms(&zones, "school", "k12");
        assert!(matches!(result, Err(DataError::NoSizeTerms { .. })));
    }

    #[test]
    fn negative_size_rejected() {
        let zones = ZoneTableBuilder::new()
            .zones([1])
            .column("EMP", vec![-4.0])
            .column("RET", vec![0.0])
            .build()
            .unwrap();
        let result = spec().dest_size_terms(&zones, "workplace", "work_low");
        assert!(matches!(result, Err(DataError::NegativeSize { .. })));
    }
}

#[cfg(test)]
mod skim_tests {
    use lc_core::ZoneId;

    use crate::{SkimDict, SkimLookup};

    #[test]
    fn lookup_by_zone_id() {
        let zones = [ZoneId(101), ZoneId(205)];
        let mut skims = SkimDict::new(&zones);
        skims.insert("DIST", vec![0.5, 3.0, 3.5, 0.7]).unwrap();
        assert_eq!(skims.lookup("DIST", ZoneId(101), ZoneId(205)), Some(3.0));
        assert_eq!(skims.lookup("DIST", ZoneId(205), ZoneId(101)), Some(3.5));
        assert_eq!(skims.lookup("DIST", ZoneId(999), ZoneId(101)), None);
        assert_eq!(skims.lookup("TIME", ZoneId(101), ZoneId(101)), None);
    }

    #[test]
    fn wrong_matrix_size_rejected() {
        let mut skims = SkimDict::new(&[ZoneId(1), ZoneId(2)]);
        assert!(skims.insert("DIST", vec![1.0; 3]).is_err());
    }

    #[test]
    fn insert_with_uses_indices() {
        let mut skims = SkimDict::new(&[ZoneId(1), ZoneId(2), ZoneId(3)]);
        skims.insert_with("DIST", |o, d| (o as f32 - d as f32).abs());
        assert_eq!(skims.lookup("DIST", ZoneId(1), ZoneId(3)), Some(2.0));
        assert!(skims.contains("DIST"));
    }
}

#[cfg(test)]
mod loader_tests {
    use std::io::Cursor;

    use lc_core::{PersonId, ZoneId};

    use crate::{
        SkimLookup, load_land_use_reader, load_population_reader, load_size_terms_reader,
        load_skims_reader,
    };

    const PERSONS_CSV: &str = "\
person_id,home_zone,is_worker,income_segment\n\
1,1,1,2\n\
2,2,0,\n\
3,2,true,1\n\
";

    #[test]
    fn persons_load_with_covariates() {
        let p = load_population_reader(Cursor::new(PERSONS_CSV)).unwrap();
        assert_eq!(p.count(), 3);
        assert_eq!(p.row_of(PersonId(3)), Some(2));
        assert_eq!(p.home_zone(1), ZoneId(2));
        assert_eq!(p.column("is_worker").unwrap(), &[1.0, 0.0, 1.0]);
        assert_eq!(p.column("income_segment").unwrap(), &[2.0, 0.0, 1.0]);
    }

    #[test]
    fn wrong_leading_column_is_parse_error() {
        let csv = "id,home_zone\n1,1\n";
        assert!(load_population_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn bad_number_is_parse_error() {
        let csv = "zone_id,EMP\n1,lots\n";
        assert!(load_land_use_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn size_terms_drop_zero_coefficients() {
        let csv = "model_selector,segment,EMP,ENROLL\nschool,k12,0,1\n";
        let spec = load_size_terms_reader(Cursor::new(csv)).unwrap();
        let coefs = spec.coefficients("school", "k12").unwrap();
        assert_eq!(coefs.len(), 1);
        assert_eq!(coefs["ENROLL"], 1.0);
    }

    #[test]
    fn skims_load_per_od_pair() {
        let csv = "origin,destination,DIST,TIME\n1,2,4.5,10\n2,1,4.0,9\n";
        let skims = load_skims_reader(Cursor::new(csv), &[ZoneId(1), ZoneId(2)]).unwrap();
        assert_eq!(skims.lookup("DIST", ZoneId(1), ZoneId(2)), Some(4.5));
        assert_eq!(skims.lookup("TIME", ZoneId(2), ZoneId(1)), Some(9.0));
        assert_eq!(skims.lookup("TIME", ZoneId(1), ZoneId(1)), Some(0.0));
    }

    #[test]
    fn skims_with_unknown_zone_fail() {
        let csv = "origin,destination,DIST\n1,9,4.5\n";
        assert!(load_skims_reader(Cursor::new(csv), &[ZoneId(1)]).is_err());
    }
}
