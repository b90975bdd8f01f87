//! Integration tests for orrery-types.

use orrery_types::{AssetKey, CameraId, ItemId, OrreryError, SystemId, VisualModelId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn sentinel_handles_are_invalid() {
    assert!(!CameraId::INVALID.is_valid());
    assert!(!VisualModelId::INVALID.is_valid());
    assert_eq!(CameraId::INVALID.0, -1);
    assert!(CameraId(0).is_valid());
    assert!(VisualModelId::from(3).is_valid());
}

#[test]
fn asset_keys_are_unique() {
    let a = AssetKey::next();
    let b = AssetKey::next();
    assert_ne!(a, b);
    assert!(b > a);
}

#[test]
fn system_ids_are_unique() {
    assert_ne!(SystemId::next(), SystemId::next());
}

#[test]
fn item_ids_compare_generation() {
    let system = SystemId(7);
    let a = ItemId { system, index: 2, generation: 0 };
    let b = ItemId { system, index: 2, generation: 1 };
    assert_ne!(a, b);
    assert_eq!(a.slot(), 2);
}

#[test]
fn ids_are_serializable() {
    let id = ItemId { system: SystemId(1), index: 4, generation: 2 };
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ItemId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = OrreryError::InvalidMesh("index 42 out of range".into());
    assert!(err.to_string().contains("index 42"));
}

#[test]
fn missing_directory_display() {
    let err = OrreryError::MissingDirectory("/nowhere/output".into());
    assert!(err.to_string().contains("/nowhere/output"));
}

#[test]
fn io_error_converts() {
    fn fails() -> orrery_types::OrreryResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
        Ok(())
    }
    assert!(matches!(fails(), Err(OrreryError::Io(_))));
}
