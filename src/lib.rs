// Lyfe Photo Gallery - Local photo browser with a remote semantic-search backend
//
// The desktop app covers:
// - Local photo listing (~/Desktop/local_photos) with cached thumbnails
// - Filtering backed by the remote search service, degrading to filename match
// - Upload staging (EXIF GPS -> reverse geocoded location) and batch upload
// - Two-phase "delete all data" maintenance flow

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Performance logging macros - exported for use by other modules
#[macro_use]
pub mod macros;

// Global state
pub mod globals;

// Core modules
pub mod backend;
pub mod gallery;
pub mod library;
pub mod maintenance;
pub mod meta;
pub mod state;
pub mod thumbs;
pub mod upload;

use backend::{HealthResponse, PhotosResponse, SearchResponse, UploadResponse};
use gallery::search::{filename_fallback, reconcile_path_matches, FilterOutcome};
use gallery::{GalleryEvent, GalleryState, REMOTE_PAGE_SIZE};
use library::{ImageInfo, LocalPhoto};
use log::{error as log_error, info as log_info};
use maintenance::DeleteFlowState;
use meta::geocode::{format_coordinates, NominatimClient};
use state::AppState;
use tauri::Manager;
use tauri_plugin_dialog::DialogExt;
use upload::{DropOutcome, PreviewPhoto};

/// Snapshot the gallery view renders after each state transition
#[derive(Debug, Serialize, Clone)]
struct GalleryView {
    photos: Vec<LocalPhoto>,
    total_matching: usize,
    has_more: bool,
    query: String,
    generation: u64,
    notice: Option<String>,
}

impl From<&GalleryState> for GalleryView {
    fn from(state: &GalleryState) -> Self {
        Self {
            photos: state.displayed().to_vec(),
            total_matching: state.filtered_photos.len(),
            has_more: state.has_more(),
            query: state.query.clone(),
            generation: state.generation,
            notice: state.notice.clone(),
        }
    }
}

// ============== Dev Mode ==============

#[tauri::command]
fn get_dev_mode() -> bool {
    globals::is_dev_mode()
}

// ============== Local Library Commands ==============

#[tauri::command]
async fn get_local_photos(state: tauri::State<'_, AppState>) -> Result<GalleryView, String> {
    let dir = globals::photos_dir();
    log_info!("Listing local photos in {:?}", dir);
    let photos = library::list_photos(&dir);

    let mut gallery = state.gallery.write().await;
    let generation = gallery.generation;
    *gallery = gallery.apply(GalleryEvent::PhotosLoaded { generation, photos });

    // A fresh listing restarts viewport lazy-load tracking
    state.lazy_loads.write().await.reset();

    Ok(GalleryView::from(&*gallery))
}

#[tauri::command]
fn get_image_info(path: String) -> Option<ImageInfo> {
    library::get_image_info(Path::new(&path))
}

/// Returns a path to a cached thumbnail, or None when generation failed and
/// the view should fall back to the original file.
#[tauri::command]
async fn generate_thumbnail(
    path: String,
    size: u32,
    state: tauri::State<'_, AppState>,
) -> Result<Option<String>, String> {
    let thumb = state
        .thumbnails()
        .get_or_generate(Path::new(&path), size)
        .map_err(|e| e.to_string())?;
    Ok(thumb.map(|p| p.to_string_lossy().to_string()))
}

/// True exactly once per (photo, size) per listing; the viewport calls this
/// as items scroll into the load margin so thumbnails are requested once.
#[tauri::command]
async fn should_load_thumbnail(
    path: String,
    size: u32,
    state: tauri::State<'_, AppState>,
) -> Result<bool, String> {
    let key = format!("{}@{}", path, size);
    Ok(state.lazy_loads.write().await.should_fetch(&key))
}

// ============== Gallery Filter Commands ==============

/// Resolve a (debounced) filter query. Bumps the generation so any slower
/// in-flight resolution for an older query gets dropped when it lands.
#[tauri::command]
async fn set_gallery_filter(
    query: String,
    state: tauri::State<'_, AppState>,
) -> Result<GalleryView, String> {
    let (generation, all_photos) = {
        let mut gallery = state.gallery.write().await;
        *gallery = gallery.apply(GalleryEvent::FilterChanged {
            query: query.clone(),
        });
        if query.is_empty() {
            return Ok(GalleryView::from(&*gallery));
        }
        (gallery.generation, gallery.all_photos.clone())
    };

    // Remote search keyed by path; filename match when the service is down
    let outcome: FilterOutcome = match state.backend().search_paths(&query).await {
        Ok(response) => {
            let paths: Vec<String> = response.matches.into_iter().map(|m| m.path).collect();
            reconcile_path_matches(&all_photos, &paths)
        }
        Err(e) => {
            log::warn!("Remote search failed, using filename match: {}", e);
            filename_fallback(&all_photos, &query)
        }
    };

    let mut gallery = state.gallery.write().await;
    *gallery = gallery.apply(GalleryEvent::FilterResolved {
        generation,
        photos: outcome.photos,
        notice: outcome.notice,
    });
    Ok(GalleryView::from(&*gallery))
}

#[tauri::command]
async fn load_more_photos(state: tauri::State<'_, AppState>) -> Result<GalleryView, String> {
    let mut gallery = state.gallery.write().await;
    *gallery = gallery.apply(GalleryEvent::LoadMore);
    Ok(GalleryView::from(&*gallery))
}

#[tauri::command]
async fn get_gallery_view(state: tauri::State<'_, AppState>) -> Result<GalleryView, String> {
    let gallery = state.gallery.read().await;
    Ok(GalleryView::from(&*gallery))
}

// ============== Remote Backend Commands ==============

#[tauri::command]
async fn check_backend_health(
    state: tauri::State<'_, AppState>,
) -> Result<HealthResponse, String> {
    state.backend().health().await.map_err(|e| e.to_string())
}

#[tauri::command]
async fn get_remote_photos(
    offset: i64,
    state: tauri::State<'_, AppState>,
) -> Result<PhotosResponse, String> {
    state
        .backend()
        .get_photos(REMOTE_PAGE_SIZE as i64, offset)
        .await
        .map_err(|e| e.to_string())
}

/// Semantic search over uploaded photos (id-keyed results with scores).
#[tauri::command]
async fn search_remote_photos(
    query: String,
    state: tauri::State<'_, AppState>,
) -> Result<SearchResponse, String> {
    state
        .backend()
        .search_photos(&query)
        .await
        .map_err(|e| e.to_string())
}

// ============== Upload Staging Commands ==============

/// Resolve a human-readable location for one staged file: EXIF GPS first,
/// then reverse geocoding, with raw coordinates as the fallback when the
/// geocoder is unreachable.
async fn resolve_location(
    path: PathBuf,
    geocoder: Arc<NominatimClient>,
) -> Result<Option<String>, String> {
    let Some(coords) = meta::extract_gps_coords(&path) else {
        return Ok(None);
    };
    match geocoder.reverse_geocode(coords).await {
        Ok(Some(name)) => Ok(Some(name)),
        Ok(None) => Ok(Some(format_coordinates(&coords))),
        Err(e) => {
            log::warn!("Reverse geocoding failed for {:?}: {}", path, e);
            Ok(Some(format_coordinates(&coords)))
        }
    }
}

/// Stage files for upload and kick off a background location extraction
/// for each accepted file.
#[tauri::command]
async fn stage_upload_files(
    paths: Vec<String>,
    state: tauri::State<'_, AppState>,
) -> Result<DropOutcome, String> {
    let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
    let outcome = state.staging.write().await.add_files(paths);

    for preview in &outcome.accepted {
        let id = preview.id;
        let path = PathBuf::from(preview.path.clone());
        let geocoder = state.geocoder_arc();
        let staging = state.staging.clone();
        tauri::async_runtime::spawn(async move {
            let result = resolve_location(path, geocoder).await;
            staging.write().await.set_location_result(id, result);
        });
    }

    Ok(outcome)
}

/// Open the native file picker, filtered to images, and stage the selection.
#[tauri::command]
async fn pick_upload_files(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<DropOutcome, String> {
    let picked = app
        .dialog()
        .file()
        .add_filter("Images", library::IMAGE_EXTENSIONS)
        .blocking_pick_files();

    let paths: Vec<String> = picked
        .unwrap_or_default()
        .into_iter()
        .filter_map(|f| f.into_path().ok())
        .map(|p| p.to_string_lossy().to_string())
        .collect();

    if paths.is_empty() {
        return Ok(DropOutcome {
            accepted: Vec::new(),
            skipped_count: 0,
            notice: None,
        });
    }
    stage_upload_files(paths, state).await
}

#[tauri::command]
async fn get_staged_photos(state: tauri::State<'_, AppState>) -> Result<Vec<PreviewPhoto>, String> {
    Ok(state.staging.read().await.previews().to_vec())
}

/// User-triggered retry of location extraction for one staged photo.
#[tauri::command]
async fn retry_photo_location(
    id: uuid::Uuid,
    state: tauri::State<'_, AppState>,
) -> Result<PreviewPhoto, String> {
    let path = {
        let mut staging = state.staging.write().await;
        let Some(preview) = staging.get(id) else {
            return Err(format!("No staged photo with id {}", id));
        };
        let path = PathBuf::from(preview.path.clone());
        staging.mark_location_loading(id);
        path
    };

    let result = resolve_location(path, state.geocoder_arc()).await;
    let mut staging = state.staging.write().await;
    staging.set_location_result(id, result);
    staging
        .get(id)
        .cloned()
        .ok_or_else(|| format!("No staged photo with id {}", id))
}

#[tauri::command]
async fn update_photo_location(
    id: uuid::Uuid,
    location: String,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    if state.staging.write().await.update_location(id, location) {
        Ok(())
    } else {
        Err(format!("No staged photo with id {}", id))
    }
}

#[tauri::command]
async fn remove_staged_photo(
    id: uuid::Uuid,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    state.staging.write().await.remove(id);
    Ok(())
}

#[tauri::command]
async fn clear_staged_photos(state: tauri::State<'_, AppState>) -> Result<(), String> {
    state.staging.write().await.clear();
    Ok(())
}

/// Submit the staged set as one upload batch. Staging is cleared only after
/// the backend accepted at least one photo.
#[tauri::command]
async fn submit_upload(state: tauri::State<'_, AppState>) -> Result<UploadResponse, String> {
    let batch = state.staging.read().await.prepare_batch();
    if batch.is_empty() {
        return Err("No photos could be prepared for upload".to_string());
    }

    log_info!("Uploading {} photos", batch.len());
    match state.backend().upload_photos(batch).await {
        Ok(response) => {
            log_info!(
                "Upload finished: {} created, {} failed",
                response.created_count,
                response.error_count
            );
            if response.created_count > 0 {
                state.staging.write().await.clear();
            }
            Ok(response)
        }
        Err(e) => {
            log_error!("Upload failed: {}", e);
            Err(format!("Failed to upload photos: {}", e))
        }
    }
}

// ============== Delete All Data Commands ==============

#[tauri::command]
async fn request_delete_preview(
    state: tauri::State<'_, AppState>,
) -> Result<DeleteFlowState, String> {
    let backend = state.backend_arc();
    let mut flow = state.delete_flow.write().await;
    flow.request_preview(&backend).await
}

#[tauri::command]
async fn confirm_delete_all(state: tauri::State<'_, AppState>) -> Result<DeleteFlowState, String> {
    let backend = state.backend_arc();
    let mut flow = state.delete_flow.write().await;
    Ok(flow.confirm(&backend).await)
}

#[tauri::command]
async fn dismiss_delete_dialog(
    state: tauri::State<'_, AppState>,
) -> Result<DeleteFlowState, String> {
    Ok(state.delete_flow.write().await.dismiss())
}

#[tauri::command]
async fn get_delete_flow_state(
    state: tauri::State<'_, AppState>,
) -> Result<DeleteFlowState, String> {
    Ok(state.delete_flow.read().await.state().clone())
}

// ============== Main App Entry ==============

pub fn run() {
    // Initialize env_logger to output to stderr (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if std::env::args().any(|arg| arg == "--dev") {
        globals::set_dev_mode(true);
        log::info!("Dev mode enabled");
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::new())
        .setup(|app| {
            log::info!("Lyfe Photo Gallery setup starting...");

            let photos_dir = globals::photos_dir();
            if let Err(e) = std::fs::create_dir_all(&photos_dir) {
                log::warn!("Failed to create photos directory {:?}: {}", photos_dir, e);
            } else {
                log::info!("Photos directory: {:?}", photos_dir);
            }

            // Probe the backend once at startup so the first view can show
            // connectivity state without waiting on a user action
            let app_state: tauri::State<AppState> = app.state();
            let backend = app_state.backend_arc();
            tauri::async_runtime::spawn(async move {
                match backend.health().await {
                    Ok(health) => log::info!("Backend reachable: {}", health.status),
                    Err(e) => log::warn!("Backend not reachable at startup: {}", e),
                }
            });

            log::info!("Lyfe Photo Gallery setup complete");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Dev mode
            get_dev_mode,
            // Local library
            get_local_photos,
            get_image_info,
            generate_thumbnail,
            should_load_thumbnail,
            // Gallery filtering and pagination
            set_gallery_filter,
            load_more_photos,
            get_gallery_view,
            // Remote backend
            check_backend_health,
            get_remote_photos,
            search_remote_photos,
            // Upload staging
            stage_upload_files,
            pick_upload_files,
            get_staged_photos,
            retry_photo_location,
            update_photo_location,
            remove_staged_photo,
            clear_staged_photos,
            submit_upload,
            // Delete all data
            request_delete_preview,
            confirm_delete_all,
            dismiss_delete_dialog,
            get_delete_flow_state,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
