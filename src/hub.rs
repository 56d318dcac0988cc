//! 资源中心：按名称获取模型/词表文件
//!
//! 资源名必须在登记表（名称 → SHA-256）中。缓存命中且哈希一致时直接返回；
//! 哈希不一致时删除缓存文件并报错（不自动重新下载）；缺失时通过 [`Fetch`]
//! 下载到临时文件，校验后原子替换到缓存路径。

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::config::HubConfig;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://shekar.ai/";

/// 下载传输层
///
/// 把 `url` 的内容完整写入 `dest`。失败时 Hub 负责清理 `dest`。
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

impl<F> Fetch for F
where
    F: Fn(&str, &Path) -> Result<()> + Send + Sync,
{
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self(url, dest)
    }
}

/// 未配置传输层：所有下载都失败
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl Fetch for NoFetch {
    fn fetch(&self, url: &str, _dest: &Path) -> Result<()> {
        Err(Error::Fetch {
            name: url.to_string(),
            reason: "no transport configured".to_string(),
        })
    }
}

pub struct Hub {
    cache_dir: PathBuf,
    base_url: String,
    registry: BTreeMap<String, String>,
    fetcher: Box<dyn Fetch>,
}

impl Hub {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
        registry: BTreeMap<String, String>,
        fetcher: impl Fetch + 'static,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            base_url: base_url.into(),
            registry,
            fetcher: Box::new(fetcher),
        }
    }

    /// 由配置构造（缓存目录在此解析）
    pub fn from_config(config: &HubConfig, fetcher: impl Fetch + 'static) -> Result<Self> {
        Ok(Self::new(
            config.resolved_cache_dir()?,
            config.base_url.clone(),
            config.resources.clone(),
            fetcher,
        ))
    }

    /// 只使用本地缓存
    pub fn offline(config: &HubConfig) -> Result<Self> {
        Self::from_config(config, NoFetch)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    fn resource_url(&self, name: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, name)
        } else {
            format!("{}/{}", self.base_url, name)
        }
    }

    /// 获取资源的本地路径
    ///
    /// 新下载的文件同样校验哈希，不一致时返回 `Integrity` 且不写入缓存。
    /// 这比只校验已缓存文件更严格。
    pub fn get_resource(&self, name: &str) -> Result<PathBuf> {
        let expected = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownResource {
                name: name.to_string(),
            })?;

        std::fs::create_dir_all(&self.cache_dir).map_err(|source| Error::File {
            path: self.cache_dir.clone(),
            source,
        })?;
        let path = self.cache_dir.join(name);

        if path.exists() {
            let actual = compute_sha256(&path)?;
            if &actual == expected {
                tracing::info!("资源缓存命中: {}", path.display());
                return Ok(path);
            }
            tracing::warn!("缓存资源哈希不一致，删除: {}", path.display());
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::warn!("删除损坏缓存失败: {}", err);
            }
            return Err(Error::Integrity {
                name: name.to_string(),
                expected: expected.clone(),
                actual,
            });
        }

        self.download(name, expected, &path)?;
        Ok(path)
    }

    /// 下载到临时文件，校验哈希后替换到目标路径
    fn download(&self, name: &str, expected: &str, path: &Path) -> Result<()> {
        let url = self.resource_url(name);
        let unique_suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let tmp_path = path.with_extension(format!("tmp.{}", unique_suffix));

        tracing::info!("下载资源: {}", url);
        if let Err(err) = self.fetcher.fetch(&url, &tmp_path) {
            tracing::warn!("资源下载失败 {}: {}", url, err);
            remove_if_exists(&tmp_path);
            return Err(match err {
                Error::Fetch { reason, .. } => Error::Fetch {
                    name: name.to_string(),
                    reason,
                },
                other => Error::Fetch {
                    name: name.to_string(),
                    reason: other.to_string(),
                },
            });
        }

        let actual = match compute_sha256(&tmp_path) {
            Ok(actual) => actual,
            Err(err) => {
                remove_if_exists(&tmp_path);
                return Err(err);
            }
        };
        if actual != expected {
            tracing::warn!("下载内容哈希不一致: {}", name);
            remove_if_exists(&tmp_path);
            return Err(Error::Integrity {
                name: name.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        if let Err(err) = replace_file(&tmp_path, path) {
            remove_if_exists(&tmp_path);
            return Err(err);
        }
        tracing::info!("资源已缓存: {}", path.display());
        Ok(())
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("cache_dir", &self.cache_dir)
            .field("base_url", &self.base_url)
            .field("resources", &self.registry.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// 流式计算文件 SHA-256（小写十六进制）
pub fn compute_sha256(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn replace_file(tmp_path: &Path, target_path: &Path) -> Result<()> {
    if target_path.exists() {
        std::fs::remove_file(target_path)?;
    }
    std::fs::rename(tmp_path, target_path)?;
    Ok(())
}

fn remove_if_exists(path: &Path) {
    if path.exists() {
        if let Err(err) = std::fs::remove_file(path) {
            tracing::warn!("清理临时文件失败: {}", err);
        }
    }
}
