//! Unit tests for lc-utility.

#[cfg(test)]
mod fixtures {
    use lc_core::ZoneId;
    use lc_data::{Population, PopulationBuilder, SkimDict, ZoneTable, ZoneTableBuilder};

    /// Two persons living in zones 1 and 2; three zones.
    pub fn tables() -> (Population, ZoneTable, SkimDict) {
        let population = PopulationBuilder::new()
            .person(1, 1)
            .person(2, 2)
            .column("income", vec![2.0, 5.0])
            .build()
            .unwrap();
        let land_use = ZoneTableBuilder::new()
            .zones([1, 2, 3])
            .column("EMP", vec![10.0, 20.0, 30.0])
            .build()
            .unwrap();
        let mut skims = SkimDict::new(&[ZoneId(1), ZoneId(2), ZoneId(3)]);
        skims.insert_with("DIST", |o, d| (o as f32 - d as f32).abs());
        (population, land_use, skims)
    }
}

#[cfg(test)]
mod term_tests {
    use crate::Term;

    #[test]
    fn tokens_parse() {
        assert_eq!("1".parse::<Term>().unwrap(), Term::Constant);
        assert_eq!("chooser:income".parse::<Term>().unwrap(), Term::Chooser("income".into()));
        assert_eq!(" alt:EMP ".parse::<Term>().unwrap(), Term::Alternative("EMP".into()));
        assert_eq!("skim:DIST".parse::<Term>().unwrap(), Term::Skim("DIST".into()));
        assert_eq!(
            "chooser:income * alt:EMP".parse::<Term>().unwrap(),
            Term::Interaction { chooser: "income".into(), alternative: "EMP".into() }
        );
        assert_eq!("mode_choice_logsum".parse::<Term>().unwrap(), Term::Logsum);
    }

    #[test]
    fn display_parses_back() {
        for token in ["chooser:a*alt:b", "skim:TIME", "sample_correction", "no_attraction"] {
            let term: Term = token.parse().unwrap();
            assert_eq!(term.to_string(), token);
        }
    }

    #[test]
    fn unknown_tokens_rejected() {
        assert!("@df.income".parse::<Term>().is_err());
        assert!("chooser:".parse::<Term>().is_err());
        assert!("alt:a*chooser:b".parse::<Term>().is_err());
    }
}

#[cfg(test)]
mod spec_tests {
    use std::io::Cursor;

    use crate::{Constants, Term, UtilityError, load_mode_spec_reader, load_spec_reader};

    const SPEC_CSV: &str = "\
Label,Expression,work_low,work_high
distance,skim:DIST,-0.5,coef_dist_high
size,ln_size,1,1
income bonus,chooser:income*alt:EMP,0,0.01
";

    #[test]
    fn narrowing_resolves_constants_and_drops_zero_rows() {
        let spec = load_spec_reader(Cursor::new(SPEC_CSV)).unwrap();
        let constants = Constants::from([("coef_dist_high".to_string(), -0.25)]);

        let low = spec.for_segment("work_low", &constants).unwrap();
        assert_eq!(low.terms.len(), 2);
        assert_eq!(low.terms[0].coefficient, -0.5);

        let high = spec.for_segment("work_high", &constants).unwrap();
        assert_eq!(high.terms.len(), 3);
        assert_eq!(high.terms[0].coefficient, -0.25);
        assert!(matches!(high.terms[2].term, Term::Interaction { .. }));
    }

    #[test]
    fn missing_constant_is_error() {
        let spec = load_spec_reader(Cursor::new(SPEC_CSV)).unwrap();
        let result = spec.for_segment("work_high", &Constants::new());
        assert!(matches!(result, Err(UtilityError::MissingConstant(c)) if c == "coef_dist_high"));
    }

    #[test]
    fn non_finite_cells_are_constant_names() {
        let csv = "Label,Expression,work\ndistance,skim:DIST,nan\nsize,ln_size,inf\n";
        let spec = load_spec_reader(Cursor::new(csv)).unwrap();

        let result = spec.for_segment("work", &Constants::new());
        assert!(matches!(result, Err(UtilityError::MissingConstant(c)) if c == "nan"));

        let constants = Constants::from([("nan".to_string(), -0.5), ("inf".to_string(), 1.0)]);
        let work = spec.for_segment("work", &constants).unwrap();
        assert_eq!(work.terms[0].coefficient, -0.5);
        assert_eq!(work.terms[1].coefficient, 1.0);
    }

    #[test]
    fn unknown_segment_is_error() {
        let spec = load_spec_reader(Cursor::new(SPEC_CSV)).unwrap();
        let result = spec.for_segment("work_veryhigh", &Constants::new());
        assert!(matches!(result, Err(UtilityError::MissingSegment(_))));
    }

    #[test]
    fn bad_expression_names_row() {
        let csv = "Label,Expression,k12\nweird,python:x,1\n";
        let err = load_spec_reader(Cursor::new(csv)).unwrap_err();
        assert!(err.to_string().contains("weird"));
    }

    #[test]
    fn mode_spec_groups_rows_by_mode() {
        let csv = "\
Label,Expression,Mode,work,school
drive time,skim:TIME,DRIVE,-0.03,-0.04
walk dist,skim:DIST,WALK,-1,-1.2
walk const,1,WALK,-0.5,
";
        let modes = load_mode_spec_reader(Cursor::new(csv)).unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0].0, "DRIVE");
        assert_eq!(modes[1].1.terms().len(), 2);

        let school_walk = modes[1].1.for_segment("school", &Constants::new()).unwrap();
        assert_eq!(school_walk.terms.len(), 1);
    }
}

#[cfg(test)]
mod evaluator_tests {
    use super::fixtures::tables;
    use crate::{
        EvalContext, InteractionRows, LinearEvaluator, ResolvedTerm, RowValues, SegmentSpec, Term,
        UtilityError, UtilityEvaluator,
    };

    fn spec(terms: Vec<(Term, f64)>) -> SegmentSpec {
        SegmentSpec {
            segment: "test".into(),
            terms:   terms
                .into_iter()
                .map(|(term, coefficient)| ResolvedTerm { label: term.to_string(), term, coefficient })
                .collect(),
        }
    }

    #[test]
    fn linear_sum_over_terms() {
        let (population, land_use, skims) = tables();
        let ctx = EvalContext::new(&population, &land_use, &skims);
        // person row 0 (home zone 1) against zones 1 and 3
        let choosers = [0, 0];
        let zones = [0, 2];
        let rows = InteractionRows::new(&choosers, &zones).unwrap();

        let spec = spec(vec![
            (Term::Constant, 1.0),
            (Term::Skim("DIST".into()), -0.5),
            (Term::SameZone, 2.0),
        ]);
        let u = LinearEvaluator.evaluate(&spec, &rows, &ctx).unwrap();
        assert_eq!(u, vec![1.0 + 0.0 + 2.0, 1.0 - 1.0]);
    }

    #[test]
    fn interaction_multiplies_chooser_and_zone() {
        let (population, land_use, skims) = tables();
        let ctx = EvalContext::new(&population, &land_use, &skims);
        let choosers = [1];
        let zones = [1];
        let rows = InteractionRows::new(&choosers, &zones).unwrap();
        let spec = spec(vec![(
            Term::Interaction { chooser: "income".into(), alternative: "EMP".into() },
            0.1,
        )]);
        let u = LinearEvaluator.evaluate(&spec, &rows, &ctx).unwrap();
        assert!((u[0] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn size_terms_and_correction() {
        let (population, land_use, skims) = tables();
        let sizes = [4.0, 0.0, 1.0];
        let picks = [2, 1];
        let probs = [0.5, 0.25];
        let ctx = EvalContext::new(&population, &land_use, &skims)
            .with_size_terms(&sizes)
            .with_row_values(RowValues { logsum: None, pick_count: Some(&picks), prob: Some(&probs) });
        let choosers = [0, 0];
        let zones = [0, 1];
        let rows = InteractionRows::new(&choosers, &zones).unwrap();

        let spec = spec(vec![
            (Term::LnSize, 1.0),
            (Term::NoAttraction, -999.0),
            (Term::SampleCorrection, 1.0),
        ]);
        let u = LinearEvaluator.evaluate(&spec, &rows, &ctx).unwrap();
        assert!((u[0] - (4.0f64.ln() + 4.0f64.ln())).abs() < 1e-12);
        assert!((u[1] - (-999.0 + 4.0f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn missing_inputs_are_errors() {
        let (population, land_use, skims) = tables();
        let ctx = EvalContext::new(&population, &land_use, &skims);
        let choosers = [0];
        let zones = [0];
        let rows = InteractionRows::new(&choosers, &zones).unwrap();

        let missing = |term: Term| LinearEvaluator.evaluate(&spec(vec![(term, 1.0)]), &rows, &ctx);
        assert!(matches!(missing(Term::Chooser("age".into())), Err(UtilityError::MissingColumn { .. })));
        assert!(matches!(missing(Term::Skim("TOLL".into())), Err(UtilityError::MissingSkim(_))));
        assert!(matches!(missing(Term::Logsum), Err(UtilityError::MissingRowValue(_))));
        assert!(matches!(missing(Term::LnSize), Err(UtilityError::MissingRowValue(_))));
    }

    #[test]
    fn mismatched_rows_rejected() {
        assert!(InteractionRows::new(&[0, 1], &[0]).is_err());
    }
}

#[cfg(test)]
mod mnl_tests {
    use crate::{draw, log_sum_exp, probabilities};

    #[test]
    fn probabilities_sum_to_one() {
        let p = probabilities(&[1.0, 2.0, 3.0]).unwrap();
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn large_utilities_are_stable() {
        let p = probabilities(&[1000.0, 1000.0]).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((log_sum_exp(&[1000.0, 1000.0]) - (1000.0 + 2f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn unavailable_alternatives() {
        let p = probabilities(&[f64::NEG_INFINITY, 0.0]).unwrap();
        assert_eq!(p, vec![0.0, 1.0]);
        assert!(probabilities(&[f64::NEG_INFINITY]).is_none());
        assert!(probabilities(&[]).is_none());
        assert!(probabilities(&[f64::NAN, 1.0]).is_none());
        assert_eq!(log_sum_exp(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn draw_uses_cumulative_distribution() {
        let probs = [0.2, 0.0, 0.8];
        assert_eq!(draw(&probs, 0.0), Some(0));
        assert_eq!(draw(&probs, 0.19), Some(0));
        assert_eq!(draw(&probs, 0.2), Some(2));
        assert_eq!(draw(&probs, 0.999_999_999), Some(2));
        assert_eq!(draw(&[0.0, 0.0], 0.5), None);
    }

    #[test]
    fn draw_absorbs_rounding_shortfall() {
        assert_eq!(draw(&[0.5, 0.499_999], 0.999_9999), Some(1));
    }
}

#[cfg(test)]
mod logsum_tests {
    use super::fixtures::tables;
    use crate::{
        Coefficient, Constants, EvalContext, InteractionRows, LinearEvaluator, LogsumModel,
        LogsumSettings, NestChild, NestSpec, Term, UtilitySpec, UtilityTerm,
    };

    fn mode(name: &str, term: Term, coef: f64) -> (String, UtilitySpec) {
        let row = UtilityTerm {
            label:        name.to_owned(),
            term,
            coefficients: [("work".to_string(), Coefficient::Value(coef))].into(),
        };
        (name.to_owned(), UtilitySpec::new(vec![row]))
    }

    fn modes() -> Vec<(String, UtilitySpec)> {
        vec![
            mode("DRIVE", Term::Skim("DIST".into()), -0.1),
            mode("WALK", Term::Skim("DIST".into()), -1.0),
            mode("BIKE", Term::Constant, -0.5),
        ]
    }

    #[test]
    fn flat_logsum_is_log_sum_exp() {
        let (population, land_use, skims) = tables();
        let ctx = EvalContext::new(&population, &land_use, &skims);
        let choosers = [0];
        let zones = [2]; // distance 2
        let rows = InteractionRows::new(&choosers, &zones).unwrap();

        let model = LogsumModel::new(modes(), None, Constants::new()).unwrap();
        let ls = model.logsums(&LinearEvaluator, "work", &rows, &ctx).unwrap();
        let expected = ((-0.2f64).exp() + (-2.0f64).exp() + (-0.5f64).exp()).ln();
        assert!((ls[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn nested_logsum_scales_by_theta() {
        let (population, land_use, skims) = tables();
        let ctx = EvalContext::new(&population, &land_use, &skims);
        let choosers = [0];
        let zones = [2];
        let rows = InteractionRows::new(&choosers, &zones).unwrap();

        let nests = NestSpec {
            name:         "root".into(),
            coefficient:  1.0,
            alternatives: vec![
                NestChild::Mode("DRIVE".into()),
                NestChild::Nest(NestSpec {
                    name:         "NONMOTOR".into(),
                    coefficient:  0.5,
                    alternatives: vec![NestChild::Mode("WALK".into()), NestChild::Mode("BIKE".into())],
                }),
            ],
        };
        let model = LogsumModel::new(modes(), Some(nests), Constants::new()).unwrap();
        let ls = model.logsums(&LinearEvaluator, "work", &rows, &ctx).unwrap();

        let nonmotor = 0.5 * ((-2.0f64 / 0.5).exp() + (-0.5f64 / 0.5).exp()).ln();
        let expected = ((-0.2f64).exp() + nonmotor.exp()).ln();
        assert!((ls[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn unknown_purpose_is_error() {
        let (population, land_use, skims) = tables();
        let ctx = EvalContext::new(&population, &land_use, &skims);
        let rows = InteractionRows::new(&[0], &[0]).unwrap();
        let model = LogsumModel::new(modes(), None, Constants::new()).unwrap();
        assert!(model.logsums(&LinearEvaluator, "univ", &rows, &ctx).is_err());
    }

    #[test]
    fn invalid_nests_rejected() {
        let leaf = |m: &str| NestChild::Mode(m.into());
        let nest = |coefficient: f64, alternatives| NestSpec { name: "n".into(), coefficient, alternatives };

        // missing BIKE
        assert!(LogsumModel::new(modes(), Some(nest(1.0, vec![leaf("DRIVE"), leaf("WALK")])), Constants::new()).is_err());
        // unknown mode
        assert!(LogsumModel::new(
            modes(),
            Some(nest(1.0, vec![leaf("DRIVE"), leaf("WALK"), leaf("BIKE"), leaf("TAXI")])),
            Constants::new()
        )
        .is_err());
        // duplicate
        assert!(LogsumModel::new(
            modes(),
            Some(nest(1.0, vec![leaf("DRIVE"), leaf("WALK"), leaf("BIKE"), leaf("WALK")])),
            Constants::new()
        )
        .is_err());
        // theta out of range
        assert!(LogsumModel::new(
            modes(),
            Some(nest(1.5, vec![leaf("DRIVE"), leaf("WALK"), leaf("BIKE")])),
            Constants::new()
        )
        .is_err());
    }

    #[test]
    fn settings_parse_with_nested_children() {
        let json = r#"{
            "spec": "mode.csv",
            "nests": {
                "name": "root", "coefficient": 1.0,
                "alternatives": ["DRIVE", {"name": "NM", "coefficient": 0.7, "alternatives": ["WALK"]}]
            }
        }"#;
        let settings: LogsumSettings = serde_json::from_str(json).unwrap();
        let root = settings.nests.unwrap();
        assert_eq!(root.alternatives[0], NestChild::Mode("DRIVE".into()));
        assert!(matches!(&root.alternatives[1], NestChild::Nest(n) if n.coefficient == 0.7));
        assert!(settings.constants.is_empty());
    }
}
