use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, bail};
use cloudflare_r2_rs::r2::R2Manager;
use tokio::fs;

/// Receipt files attached to ledger entries.
///
/// Files land in R2 when a bucket is configured, otherwise on local disk.
/// Reads fall back to disk so receipts written before R2 was enabled keep
/// being served.
#[derive(Clone)]
pub struct Storage {
    receipt_path: PathBuf,
    r2: Option<Arc<R2Manager>>,
}

impl Storage {
    pub async fn new(
        receipt_path: PathBuf,
        bucket_name: &str,
        cloudflare_kv_uri: &str,
        cloudflare_kv_client_id: &str,
        cloudflare_kv_secret: &str,
    ) -> Self {
        let r2 = if bucket_name != "none" && !bucket_name.is_empty() {
            Some(Arc::new(
                R2Manager::new(
                    bucket_name,
                    cloudflare_kv_uri,
                    cloudflare_kv_client_id,
                    cloudflare_kv_secret,
                )
                .await,
            ))
        } else {
            None
        };

        Self { receipt_path, r2 }
    }

    /// Disk-only storage, used when no bucket is configured.
    pub fn local(receipt_path: PathBuf) -> Self {
        Self {
            receipt_path,
            r2: None,
        }
    }

    fn receipt_file(&self, name_with_ext: &str) -> PathBuf {
        self.receipt_path.join(name_with_ext)
    }

    fn receipt_key(&self, name_with_ext: &str) -> String {
        format!("receipts/{name_with_ext}")
    }

    pub async fn save_receipt(&self, name_with_ext: &str, data: &[u8]) -> Result<()> {
        check_name(name_with_ext)?;

        if let Some(r2) = &self.r2 {
            r2.upload(
                &self.receipt_key(name_with_ext),
                data,
                None,
                Some(content_type(name_with_ext)),
            )
            .await;
        } else {
            fs::create_dir_all(&self.receipt_path).await?;
            fs::write(self.receipt_file(name_with_ext), data).await?;
        }

        Ok(())
    }

    pub async fn load_receipt(&self, name_with_ext: &str) -> Result<Vec<u8>> {
        check_name(name_with_ext)?;

        if let Some(r2) = &self.r2
            && let Some(receipt) = r2.get(&self.receipt_key(name_with_ext)).await
        {
            return Ok(receipt);
        }

        Ok(fs::read(self.receipt_file(name_with_ext)).await?)
    }
}

/// Content type for a stored receipt, derived from its extension.
pub fn content_type(name_with_ext: &str) -> &'static str {
    let lower = name_with_ext.to_lowercase();

    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".jpeg") || lower.ends_with(".jpg") {
        "image/jpeg"
    } else if lower.ends_with(".png") {
        "image/png"
    } else {
        "application/octet-stream"
    }
}

// names come from content hashes; anything else is a path trick
fn check_name(name_with_ext: &str) -> Result<()> {
    let valid = !name_with_ext.is_empty()
        && name_with_ext
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.')
        && !name_with_ext.starts_with('.');

    if !valid {
        bail!("invalid receipt name: {name_with_ext}");
    }

    Ok(())
}
