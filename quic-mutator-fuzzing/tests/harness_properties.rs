use proptest::prelude::*;
use quic_mutator_fuzzing::generators::{BytesGenerator, MutationListGenerator};
use quic_mutator_fuzzing::harness::{CaseOutcome, HandshakeHarness, HarnessConfig};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_cases_never_violate(seed in any::<u64>(), invalid_ratio in 0.0f64..=1.0) {
        let config = HarnessConfig {
            invalid_ratio,
            ..Default::default()
        };
        let mut harness = HandshakeHarness::new(config, seed);

        for _ in 0..10 {
            let (case, outcome) = harness.run_generated();
            prop_assert!(!outcome.is_violation(), "{} -> {:?}", case.to_text(), outcome);
        }
    }

    #[test]
    fn byte_driven_cases_apply(data in proptest::collection::vec(any::<u8>(), 0..512), seed in any::<u64>()) {
        let case = match MutationListGenerator::default().from_bytes(&data) {
            Ok(case) => case,
            Err(_) => return Ok(()),
        };
        let mut harness = HandshakeHarness::new(HarnessConfig::default(), seed);
        let outcome = harness.run_text(&case.to_text());
        prop_assert!(matches!(outcome, CaseOutcome::Applied { .. }), "{:?}", outcome);
    }
}
