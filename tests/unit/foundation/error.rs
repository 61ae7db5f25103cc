use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HandanimError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        HandanimError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        HandanimError::malformed("x")
            .to_string()
            .contains("malformed sequence:")
    );
    assert!(
        HandanimError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn interval_error_reports_both_bounds() {
    let msg = HandanimError::InvalidInterval {
        start: 2.0,
        end: 1.5,
    }
    .to_string();
    assert!(msg.contains("1.5"));
    assert!(msg.contains('2'));
}

#[test]
fn reference_errors_name_the_drawable() {
    let id = DrawableId::from_u128(0xabc);
    assert!(
        HandanimError::DanglingReference(id)
            .to_string()
            .contains(&id.to_string())
    );
    assert!(
        HandanimError::InvalidGroupDeletion(id)
            .to_string()
            .contains("creation event")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HandanimError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
