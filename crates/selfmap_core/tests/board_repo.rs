mod common;

use common::{evidence, memory_repo, trait_record};
use selfmap_core::model::evidence::EvidencePatch;
use selfmap_core::model::traits::TraitPatch;
use selfmap_core::{EvidenceRepository, LinkRepository, RepoError, TraitRepository};

#[test]
fn upsert_evidence_inserts_then_updates_in_place() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "first")).unwrap();
    repo.upsert_evidence(&evidence("e1", "second")).unwrap();

    let rows = repo.list_evidence().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content.as_deref(), Some("second"));
}

#[test]
fn upsert_evidence_rejects_blank_content() {
    let repo = memory_repo();
    let err = repo.upsert_evidence(&evidence("e1", "  ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_evidence().unwrap().is_empty());
}

#[test]
fn update_evidence_touches_only_patched_fields() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "draft")).unwrap();
    repo.update_evidence("e1", &EvidencePatch::content("final"))
        .unwrap();

    let row = repo.list_evidence().unwrap().remove(0);
    assert_eq!(row.content.as_deref(), Some("final"));
    assert_eq!(row.date.as_deref(), Some("2024-05-01"));
}

#[test]
fn update_missing_evidence_returns_not_found() {
    let repo = memory_repo();
    let err = repo
        .update_evidence("ghost", &EvidencePatch::content("x"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "evidence", .. }));
}

#[test]
fn list_evidence_keeps_insertion_order() {
    let repo = memory_repo();
    for id in ["e3", "e1", "e2"] {
        repo.upsert_evidence(&evidence(id, id)).unwrap();
    }
    let ids: Vec<String> = repo
        .list_evidence()
        .unwrap()
        .into_iter()
        .map(|row| row.id)
        .collect();
    assert_eq!(ids, vec!["e3", "e1", "e2"]);
}

#[test]
fn upsert_and_rename_trait() {
    let repo = memory_repo();
    repo.upsert_trait(&trait_record("t1", "Trait 1")).unwrap();
    repo.upsert_trait(&trait_record("t1", "Trait 1")).unwrap();
    repo.update_trait("t1", &TraitPatch::name("Introvert"))
        .unwrap();

    let rows = repo.list_traits().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name.as_deref(), Some("Introvert"));

    let err = repo
        .update_trait("missing", &TraitPatch::name("x"))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "trait", .. }));
}

#[test]
fn delete_trait_keeps_evidence_and_drops_links() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "quiet mornings")).unwrap();
    repo.upsert_trait(&trait_record("t1", "Introvert")).unwrap();
    repo.attach_evidence("t1", "e1").unwrap();

    repo.delete_trait("t1").unwrap();

    assert!(repo.list_traits().unwrap().is_empty());
    assert_eq!(repo.list_evidence().unwrap().len(), 1);
    assert!(repo.list_links(&["t1".to_string()]).unwrap().is_empty());
}

#[test]
fn attach_is_idempotent_and_detach_tolerates_missing_pairs() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "a")).unwrap();
    repo.upsert_trait(&trait_record("t1", "T")).unwrap();

    repo.attach_evidence("t1", "e1").unwrap();
    repo.attach_evidence("t1", "e1").unwrap();
    assert_eq!(repo.list_links(&["t1".to_string()]).unwrap().len(), 1);

    repo.detach_evidence("t1", "e1").unwrap();
    repo.detach_evidence("t1", "e1").unwrap();
    assert!(repo.list_links(&["t1".to_string()]).unwrap().is_empty());
}

#[test]
fn evidence_links_to_at_most_one_trait() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "a")).unwrap();
    repo.upsert_trait(&trait_record("t1", "One")).unwrap();
    repo.upsert_trait(&trait_record("t2", "Two")).unwrap();

    repo.attach_evidence("t1", "e1").unwrap();
    assert!(repo.attach_evidence("t2", "e1").is_err());
}

#[test]
fn deleting_evidence_cascades_to_links() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "a")).unwrap();
    repo.upsert_trait(&trait_record("t1", "T")).unwrap();
    repo.attach_evidence("t1", "e1").unwrap();

    repo.delete_evidence("e1").unwrap();
    repo.delete_evidence("e1").unwrap();

    assert!(repo.list_links(&["t1".to_string()]).unwrap().is_empty());
    assert_eq!(repo.list_traits().unwrap().len(), 1);
}

#[test]
fn list_links_filters_by_trait_and_joins_evidence() {
    let repo = memory_repo();
    repo.upsert_evidence(&evidence("e1", "a")).unwrap();
    repo.upsert_evidence(&evidence("e2", "b")).unwrap();
    repo.upsert_trait(&trait_record("t1", "One")).unwrap();
    repo.upsert_trait(&trait_record("t2", "Two")).unwrap();
    repo.attach_evidence("t1", "e1").unwrap();
    repo.attach_evidence("t2", "e2").unwrap();

    let links = repo.list_links(&["t2".to_string()]).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].evidence_id, "e2");
    assert_eq!(
        links[0].evidence.as_ref().and_then(|row| row.content.as_deref()),
        Some("b")
    );
    assert!(repo.list_links(&[]).unwrap().is_empty());
}
