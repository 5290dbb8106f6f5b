use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

pub fn dish_media_dir(media_dir: &str, dish_id: i64) -> PathBuf {
    Path::new(media_dir).join("dishes").join(dish_id.to_string())
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

async fn discard(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != io::ErrorKind::NotFound {
            warn!("Could not remove {}: {err}", path.display());
        }
    }
}

/// Stores `bytes` as `dir/file_name` only once `commit` succeeds, then drops
/// the `previous` file. A failed commit leaves the directory as it was.
pub async fn replace_image<T, E, F, Fut>(
    dir: &Path,
    file_name: &str,
    previous: Option<&str>,
    bytes: &[u8],
    commit: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<io::Error>,
{
    tokio::fs::create_dir_all(dir).await?;
    let staged = dir.join(format!(".{file_name}.part"));
    tokio::fs::write(&staged, bytes).await?;

    let committed = match commit().await {
        Ok(committed) => committed,
        Err(err) => {
            discard(&staged).await;
            return Err(err);
        }
    };

    if let Err(err) = tokio::fs::rename(&staged, dir.join(file_name)).await {
        discard(&staged).await;
        return Err(err.into());
    }

    if let Some(previous) = previous.filter(|previous| *previous != file_name) {
        discard(&dir.join(previous)).await;
    }

    Ok(committed)
}
