//! Persisted artifact format
//!
//! Both backends store the same bytes: a UTF-8 JSON array of phases,
//! pretty-printed with two-space indentation. [`decode`] accepts exactly what
//! [`encode`] produces and re-checks the document invariants.

use crate::error::DocumentError;
use crate::roadmap::RoadmapDocument;

/// Serialize the full document
///
/// # Errors
/// Returns `DocumentError::Encode` if serialization fails
pub fn encode(doc: &RoadmapDocument) -> Result<Vec<u8>, DocumentError> {
    serde_json::to_vec_pretty(doc).map_err(|e| DocumentError::Encode(e.to_string()))
}

/// Deserialize and validate a document
///
/// # Errors
/// - `DocumentError::Malformed` for invalid JSON, unknown difficulty or
///   category tags, or broken invariants
///
/// Unknown status strings are accepted and load as `Completed`.
pub fn decode(bytes: &[u8]) -> Result<RoadmapDocument, DocumentError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::PhaseId;
    use crate::seed;
    use crate::status::Status;
    use pretty_assertions::assert_eq;

    #[test]
    fn encoded_shape_matches_wire_contract() {
        let bytes = encode(seed::default_roadmap()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let phase = &value[0];
        assert_eq!(phase["id"], 1);
        for key in ["title", "duration", "description", "focus", "certs", "skills", "projects"] {
            assert!(phase.get(key).is_some(), "missing {key}");
        }

        let cert = &phase["certs"][0];
        assert_eq!(cert["code"], "AI-900");
        assert_eq!(cert["status"], "IN_PROGRESS");
        assert_eq!(cert["difficulty"], "Beginner");
        assert!(cert.get("studyGuide").is_none());

        let guided = &value[1]["certs"][1];
        assert!(guided["studyGuide"].as_str().unwrap().contains("ab-900"));

        assert_eq!(phase["skills"][0]["mastered"], false);
        assert_eq!(phase["skills"][0]["category"], "Architecture");
        assert!(phase["projects"][0]["techStack"].is_array());
        assert!(phase["projects"][0]["deliverables"].is_array());
    }

    #[test]
    fn pretty_printed_with_two_spaces() {
        let bytes = encode(seed::default_roadmap()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 1,"));
    }

    #[test]
    fn roundtrip_preserves_mutations() {
        let doc = seed::default_roadmap()
            .toggle_skill_mastery(PhaseId(4), "Change Management")
            .rotate_project_status(PhaseId(3), "Project Gamma: Intelligent Search");
        let back = decode(&encode(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn decode_rejects_invalid_documents() {
        assert!(decode(b"{}").is_err());
        assert!(decode(b"not json").is_err());

        let bad_difficulty = br#"[{"id":1,"title":"t","duration":"d","description":"x","focus":"f",
            "certs":[{"code":"A","name":"n","description":"d","link":"l","difficulty":"Guru","status":"LOCKED"}],
            "skills":[],"projects":[]}]"#;
        assert!(matches!(decode(bad_difficulty), Err(DocumentError::Malformed(_))));

        let dup_phase = br#"[
            {"id":1,"title":"t","duration":"d","description":"x","focus":"f","certs":[],"skills":[],"projects":[]},
            {"id":1,"title":"t","duration":"d","description":"x","focus":"f","certs":[],"skills":[],"projects":[]}]"#;
        assert!(decode(dup_phase).is_err());
    }

    #[test]
    fn unknown_status_loads_and_rotates_to_locked() {
        let bytes = br#"[{"id":1,"title":"t","duration":"d","description":"x","focus":"f",
            "certs":[{"code":"A","name":"n","description":"d","link":"l","difficulty":"Beginner","status":"NOT_STARTED"}],
            "skills":[],
            "projects":[{"title":"P","description":"d","techStack":[],"deliverables":[],"status":"DONE"}]}]"#;
        let doc = decode(bytes).unwrap();
        assert_eq!(doc.certification(PhaseId(1), "A").unwrap().status(), Status::Completed);
        assert_eq!(doc.project(PhaseId(1), "P").unwrap().status(), Status::Completed);

        let next = doc
            .rotate_certification_status(PhaseId(1), "A")
            .rotate_project_status(PhaseId(1), "P");
        assert_eq!(next.certification(PhaseId(1), "A").unwrap().status(), Status::Locked);
        assert_eq!(next.project(PhaseId(1), "P").unwrap().status(), Status::Locked);
    }

    #[test]
    fn empty_document_roundtrips() {
        let bytes = encode(&RoadmapDocument::default()).unwrap();
        assert_eq!(bytes, b"[]");
        assert!(decode(&bytes).unwrap().is_empty());
    }
}
