use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{ConversionOutput, PublishedArtifacts};
use crate::utils::error::Result;

/// URL path under which the output directory is served.
pub const PUBLIC_ROUTE: &str = "public";

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex"));

/// Derives the stem shared by both artifacts from an uploaded file name.
///
/// Directory components and the extension are dropped, unsafe characters are
/// replaced with `_`.
pub fn artifact_stem(original_name: &str) -> String {
    // Windows 用戶端可能傳入反斜線路徑
    let file_name = original_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let sanitized = UNSAFE_NAME_CHARS.replace_all(stem, "_");
    let sanitized = sanitized.trim_matches('.');

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized.to_string()
    }
}

/// Persists conversion outputs through a [`Storage`] and builds their URLs.
pub struct ArtifactPublisher<S: Storage> {
    storage: S,
    public_base: Url,
    unique_names: bool,
}

impl<S: Storage> ArtifactPublisher<S> {
    pub fn new<C: ConfigProvider>(storage: S, config: &C) -> Result<Self> {
        let mut base = config.base_url().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let public_base = Url::parse(&base)?.join(&format!("{}/", PUBLIC_ROUTE))?;

        Ok(Self {
            storage,
            public_base,
            unique_names: config.unique_names(),
        })
    }

    fn stem_for(&self, original_name: &str) -> String {
        let stem = artifact_stem(original_name);
        if self.unique_names {
            format!("{}-{}", stem, Uuid::new_v4().simple())
        } else {
            stem
        }
    }

    pub async fn publish(
        &self,
        original_name: &str,
        output: &ConversionOutput,
    ) -> Result<PublishedArtifacts> {
        let stem = self.stem_for(original_name);
        let xlsx_name = format!("{}.xlsx", stem);
        let png_name = format!("{}.png", stem);

        tokio::try_join!(
            self.storage.write_file(&xlsx_name, &output.spreadsheet),
            self.storage.write_file(&png_name, &output.chart),
        )?;
        tracing::debug!(
            "Wrote {} ({} bytes) and {} ({} bytes)",
            xlsx_name,
            output.spreadsheet.len(),
            png_name,
            output.chart.len()
        );

        Ok(PublishedArtifacts {
            xlsx_url: self.public_base.join(&xlsx_name)?.to_string(),
            png_url: self.public_base.join(&png_name)?.to_string(),
            xlsx_name,
            png_name,
        })
    }
}
