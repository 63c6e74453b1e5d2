use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum! {
    ClaimStatus, "claim_status" {
        Pending => "pending",
        Processing => "processing",
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// A payout request against one policy, owned by the policy's user
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub id: i64,
    pub claim_number: String,
    pub claim_amount: f64,
    pub incident_date: NaiveDate,
    pub claim_date: Option<NaiveDate>,
    pub status: ClaimStatus,
    pub description: String,
    /// JSON-encoded list of stored document filenames, kept verbatim
    pub documents: Option<String>,
    pub remarks: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub user_id: i64,
    pub policy_id: i64,
}

impl Claim {
    /// Decode the stored document list. A malformed value reads as empty.
    pub fn document_list(&self) -> Vec<String> {
        self.documents
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .unwrap_or_default()
    }

    /// Encode stored filenames for the `documents` column. No files → NULL.
    pub fn encode_documents(files: &[String]) -> Option<String> {
        if files.is_empty() {
            None
        } else {
            serde_json::to_string(files).ok()
        }
    }
}

/// Fields a user supplies when submitting a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    pub claim_number: String,
    pub policy_id: i64,
    pub claim_amount: f64,
    pub incident_date: NaiveDate,
    pub description: String,
}

/// Agent/admin review of a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimUpdate {
    pub status: ClaimStatus,
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_with_documents(documents: Option<&str>) -> Claim {
        Claim {
            id: 1,
            claim_number: "CLM-00001".to_string(),
            claim_amount: 900.0,
            incident_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            claim_date: None,
            status: ClaimStatus::Pending,
            description: "Rear bumper damaged in car park".to_string(),
            documents: documents.map(str::to_string),
            remarks: None,
            created_at: None,
            updated_at: None,
            user_id: 1,
            policy_id: 10,
        }
    }

    #[test]
    fn test_document_list_decodes_json() {
        let claim = claim_with_documents(Some(r#"["20250105_101500_photo.jpg","20250105_101500_report.pdf"]"#));
        assert_eq!(
            claim.document_list(),
            vec!["20250105_101500_photo.jpg", "20250105_101500_report.pdf"]
        );
    }

    #[test]
    fn test_malformed_document_list_degrades_to_empty() {
        assert!(claim_with_documents(Some("not json")).document_list().is_empty());
        assert!(claim_with_documents(None).document_list().is_empty());
    }

    #[test]
    fn test_encode_documents() {
        assert_eq!(Claim::encode_documents(&[]), None);
        let encoded = Claim::encode_documents(&["a.pdf".to_string()]).unwrap();
        assert_eq!(encoded, r#"["a.pdf"]"#);
    }
}
