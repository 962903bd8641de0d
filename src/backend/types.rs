// Wire types for the gallery backend API
//
// Every endpoint gets an explicit response struct with all fields typed;
// nothing is probed out of loose JSON at the call site.

use serde::{Deserialize, Serialize};

/// A photo as persisted by the backend. The client treats this as an
/// opaque read-only projection; all consistency is the backend's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePhoto {
    pub id: i64,
    /// Base64-encoded image bytes
    pub data: String,
    pub file_type: String,
    pub location: String,
    pub created_at: String,
    pub updated_at: String,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
    pub returned: i64,
}

/// `GET /photos?limit&offset`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosResponse {
    pub success: bool,
    pub photos: Vec<RemotePhoto>,
    pub pagination: Pagination,
}

/// One photo in an upload batch, built client-side from a local file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPhoto {
    /// Base64-encoded (resized) image bytes
    pub data: String,
    pub location: String,
    /// RFC3339; EXIF capture date when available, otherwise upload time
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct UploadRequest {
    pub photos: Vec<UploadPhoto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPhoto {
    pub index: i64,
    pub location: String,
    pub timestamp: String,
    pub file_type: String,
}

/// `POST /upload_photos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub created_count: i64,
    pub error_count: i64,
    #[serde(default)]
    pub created_photos: Vec<CreatedPhoto>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub query: String,
}

/// One hit from the id-keyed search contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub photo: RemotePhoto,
    pub score: f64,
    pub photo_id: i64,
}

/// `POST /search` — id-keyed contract (web client): hits carry the full
/// photo payload, so no further local filtering is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: i64,
}

/// One hit from the path-keyed search contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathMatch {
    pub path: String,
}

/// `POST /search` — path-keyed contract (desktop shell). Incompatible with
/// [`SearchResponse`]; both are kept until the authoritative backend
/// contract is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSearchResponse {
    pub matches: Vec<PathMatch>,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllRequest {
    /// Absent/false requests a non-mutating preview; true performs the
    /// deletion
    pub confirmed: bool,
}

/// Counts of rows a confirmed deletion would remove
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePreviewCounts {
    pub postgresql_photos: i64,
    /// The backend reports "unknown" when the vector index cannot be
    /// counted, so this stays loosely typed on purpose
    pub pinecone_vectors: serde_json::Value,
}

/// `POST /delete_all_data {}` — preview phase, never mutates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePreviewResponse {
    pub success: bool,
    pub message: String,
    pub data_to_delete: DeletePreviewCounts,
    pub confirmation_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDeletionResult {
    pub before: i64,
    #[serde(default)]
    pub deleted: i64,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResults {
    pub postgresql: StoreDeletionResult,
    pub pinecone: StoreDeletionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionVerification {
    pub postgresql_photos_remaining: i64,
}

/// `POST /delete_all_data {confirmed: true}` — per-store breakdown so a
/// partial failure names which backing store failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResultResponse {
    pub success: bool,
    pub message: String,
    pub results: DeletionResults,
    pub verification: DeletionVerification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photos_response_parses() {
        let json = r#"{
            "success": true,
            "photos": [{
                "id": 7,
                "data": "aGVsbG8=",
                "file_type": "jpg",
                "location": "Lisbon, Portugal",
                "created_at": "2024-05-01T10:00:00+00:00",
                "updated_at": "2024-05-01T10:00:00+00:00"
            }],
            "pagination": {"offset": 0, "limit": 20, "total": 41, "returned": 1}
        }"#;
        let parsed: PhotosResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.photos.len(), 1);
        assert_eq!(parsed.photos[0].id, 7);
        assert_eq!(parsed.pagination.total, 41);
    }

    #[test]
    fn test_upload_response_defaults_optional_lists() {
        let json = r#"{"success": true, "created_count": 3, "error_count": 0}"#;
        let parsed: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.created_count, 3);
        assert!(parsed.created_photos.is_empty());
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_both_search_contracts_parse() {
        let id_keyed = r#"{
            "success": true,
            "query": "sunset",
            "results": [{
                "photo": {
                    "id": 3, "data": "eA==", "file_type": "png",
                    "location": "Unknown Location",
                    "created_at": "2024-01-01T00:00:00+00:00",
                    "updated_at": "2024-01-01T00:00:00+00:00"
                },
                "score": 0.42,
                "photo_id": 3
            }],
            "count": 1
        }"#;
        let parsed: SearchResponse = serde_json::from_str(id_keyed).unwrap();
        assert_eq!(parsed.results[0].photo_id, 3);

        let path_keyed = r#"{"matches": [{"path": "/photos/a.jpg"}, {"path": "/photos/b.jpg"}]}"#;
        let parsed: PathSearchResponse = serde_json::from_str(path_keyed).unwrap();
        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].path, "/photos/a.jpg");
    }

    #[test]
    fn test_delete_preview_tolerates_unknown_vector_count() {
        let json = r#"{
            "success": false,
            "message": "Confirmation required. This will delete all data permanently.",
            "data_to_delete": {"postgresql_photos": 12, "pinecone_vectors": "unknown"},
            "confirmation_required": true
        }"#;
        let parsed: DeletePreviewResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.confirmation_required);
        assert_eq!(parsed.data_to_delete.postgresql_photos, 12);
    }

    #[test]
    fn test_delete_result_breakdown_parses_partial_failure() {
        let json = r#"{
            "success": false,
            "message": "Data deletion completed with some errors",
            "results": {
                "postgresql": {"before": 12, "deleted": 12, "success": true, "error": null},
                "pinecone": {"before": 12, "success": false, "error": "index unreachable"}
            },
            "verification": {"postgresql_photos_remaining": 0}
        }"#;
        let parsed: DeleteResultResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.success);
        assert!(parsed.results.postgresql.success);
        assert!(!parsed.results.pinecone.success);
        assert_eq!(
            parsed.results.pinecone.error.as_deref(),
            Some("index unreachable")
        );
        assert_eq!(parsed.verification.postgresql_photos_remaining, 0);
    }
}
