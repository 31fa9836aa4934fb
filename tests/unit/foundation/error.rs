use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HomewardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(HomewardError::asset("x").to_string().contains("asset error:"));
    assert!(
        HomewardError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(HomewardError::encode("x").to_string().contains("encode error:"));
    assert!(
        HomewardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HomewardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
