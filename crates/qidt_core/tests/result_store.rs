use qidt_core::repo::result_repo::{DATA_FILE_NAME, IMAGE_FILE_NAME};
use qidt_core::{
    FsResultRepository, ResultService, ResultServiceError, StructureInput, StructureTag,
    ValidationError,
};
use std::fs;
use std::path::Path;

fn service(root: &Path) -> ResultService<FsResultRepository> {
    ResultService::new(FsResultRepository::new(root.join("results")))
}

fn input(name: &str) -> StructureInput {
    StructureInput {
        scf_energy: -1234.5,
        homo: -0.5,
        lumo: -0.25,
        dipole_moment: 3.25,
        mulliken_max: 0.5,
        mulliken_min: -0.75,
        e_total: -500.0,
        e_substrate: -300.0,
        e_molecule: -199.5,
        notes: "安定構造".to_string(),
        ..StructureInput::named(name)
    }
}

#[test]
fn save_and_reload_recomputes_derived_values() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    let saved = svc.create_result(input("MMA-MAA Trimer"), None).unwrap();
    assert_eq!(saved.tag, StructureTag::Trimer);
    assert_eq!(saved.mu(), 0.375);
    assert_eq!(saved.qide(), -0.5);
    assert!(dir
        .path()
        .join("results/MMA-MAA_Trimer")
        .join(DATA_FILE_NAME)
        .is_file());

    let loaded = svc.get_result("MMA-MAA Trimer").unwrap();
    assert_eq!(loaded.input, saved.input);
    assert_eq!(loaded.tag, StructureTag::Trimer);
    assert_eq!(loaded.mu(), 0.375);
    assert_eq!(loaded.qide(), -0.5);
    assert!(loaded.image_path.is_none());
}

#[test]
fn written_yaml_uses_the_japanese_keys() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.create_result(input("Bulk Slab"), None).unwrap();

    let yaml = fs::read_to_string(dir.path().join("results/Bulk_Slab").join(DATA_FILE_NAME))
        .unwrap();
    for key in ["構造名: Bulk Slab", "タグ: Other", "μ: 0.375", "QIDE: -0.5", "メモ: 安定構造"] {
        assert!(yaml.contains(key), "missing `{key}` in\n{yaml}");
    }
    assert!(yaml.starts_with("E_molecule:"));
}

#[test]
fn hand_edited_derived_values_do_not_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.create_result(input("MMA Dimer"), None).unwrap();

    let data_path = dir.path().join("results/MMA_Dimer").join(DATA_FILE_NAME);
    let edited = fs::read_to_string(&data_path)
        .unwrap()
        .replace("μ: 0.375", "μ: 42.0")
        .replace("タグ: Dimer", "タグ: Tetramer");
    fs::write(&data_path, edited).unwrap();

    let loaded = svc.get_result("MMA Dimer").unwrap();
    assert_eq!(loaded.mu(), 0.375);
    assert_eq!(loaded.tag, StructureTag::Dimer);
}

#[test]
fn classification_follows_rule_order() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    let cases = [
        ("Dimer of Trimer", StructureTag::Trimer),
        ("MMA Dimer", StructureTag::Dimer),
        ("Tetramer Dimer", StructureTag::Dimer),
        ("MMA Tetramer", StructureTag::Tetramer),
        ("dimer lowercase", StructureTag::Other),
        ("Monomer", StructureTag::Other),
    ];
    for (name, tag) in cases {
        assert_eq!(svc.create_result(input(name), None).unwrap().tag, tag, "{name}");
    }

    let listed = svc.list_results().unwrap();
    assert_eq!(listed.len(), cases.len());
    for result in &listed {
        let expected = cases
            .iter()
            .find(|(name, _)| *name == result.name())
            .map(|(_, tag)| *tag);
        assert_eq!(Some(result.tag), expected);
    }
}

#[test]
fn create_refuses_existing_name_but_save_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.create_result(input("MMA Dimer"), Some(b"png-1")).unwrap();

    let err = svc.create_result(input("MMA Dimer"), None).unwrap_err();
    assert!(matches!(err, ResultServiceError::Conflict(name) if name == "MMA Dimer"));

    let mut edited = input("MMA Dimer");
    edited.homo = -1.0;
    edited.notes = "再計算".to_string();
    let saved = svc.save_result(edited, None).unwrap();
    assert_eq!(saved.mu(), 0.625);

    let loaded = svc.get_result("MMA Dimer").unwrap();
    assert_eq!(loaded.input.notes, "再計算");
    let image = loaded.image_path.unwrap();
    assert!(image.ends_with(IMAGE_FILE_NAME));
    assert_eq!(fs::read(image).unwrap(), b"png-1");
    assert_eq!(svc.list_results().unwrap().len(), 1);
}

#[test]
fn save_replaces_image_when_given() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.create_result(input("Slab"), Some(b"old")).unwrap();
    let saved = svc.save_result(input("Slab"), Some(b"new")).unwrap();
    assert_eq!(fs::read(saved.image_path.unwrap()).unwrap(), b"new");
}

#[test]
fn blank_name_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    let err = svc.create_result(input("   "), None).unwrap_err();
    assert!(matches!(
        err,
        ResultServiceError::Validation(ValidationError::EmptyStructureName)
    ));
    assert!(!dir.path().join("results").exists());
}

#[test]
fn delete_removes_directory_and_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    svc.create_result(input("Gone Soon"), Some(b"img")).unwrap();

    svc.delete_result("Gone Soon").unwrap();
    assert!(!dir.path().join("results/Gone_Soon").exists());
    assert!(svc.list_results().unwrap().is_empty());

    assert!(matches!(
        svc.delete_result("Gone Soon"),
        Err(ResultServiceError::ResultNotFound(_))
    ));
    assert!(matches!(
        svc.get_result("Never Saved"),
        Err(ResultServiceError::ResultNotFound(_))
    ));
}

#[test]
fn listing_skips_unreadable_directories() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());
    assert!(svc.list_results().unwrap().is_empty());

    svc.create_result(input("Good"), None).unwrap();
    let broken = dir.path().join("results/Broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join(DATA_FILE_NAME), "HOMO: [not a number").unwrap();
    fs::create_dir_all(dir.path().join("results/empty_dir")).unwrap();

    let listed = svc.list_results().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name(), "Good");
}

#[test]
fn names_that_are_not_file_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let svc = service(dir.path());

    let err = svc.create_result(input("MMA/MAA Dimer"), None).unwrap_err();
    assert!(matches!(
        err,
        ResultServiceError::Validation(ValidationError::InvalidName(ref name)) if name == "MMA/MAA Dimer"
    ));
    assert!(err.to_string().contains("MMA/MAA Dimer"));
    assert!(!err.to_string().contains("outside"));
    assert!(!dir.path().join("results").exists());

    assert!(matches!(
        svc.get_result(".."),
        Err(ResultServiceError::Validation(ValidationError::InvalidName(_)))
    ));
}
