//! Sound Context - SoundIndex 聚合根

use std::collections::HashMap;
use std::path::PathBuf;

use super::{SoundAsset, SoundSource};
use crate::domain::phrase::PhraseKey;

/// 索引冲突（非致命）
///
/// 同一规范化 key 出现多个文件时，先发现的保留，后发现的被忽略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCollision {
    pub key: PhraseKey,
    pub kept: PathBuf,
    pub ignored: PathBuf,
}

/// SoundIndex 聚合根
///
/// 不变量:
/// - 每个 key 只映射到一个素材
/// - 冲突时先写入者胜出，已有条目永不被覆盖
#[derive(Debug, Default, Clone)]
pub struct SoundIndex {
    phrases: HashMap<PhraseKey, SoundAsset>,
    paths: HashMap<String, SoundAsset>,
    collisions: Vec<IndexCollision>,
    next_order: usize,
}

impl SoundIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个素材
    ///
    /// `relative` 为相对声音目录的路径（不含扩展名）。
    /// 发生冲突时返回冲突信息，索引保持不变
    pub fn insert(
        &mut self,
        relative: &str,
        path: PathBuf,
        source: SoundSource,
    ) -> Result<&SoundAsset, IndexCollision> {
        let key = PhraseKey::from_path(relative);

        if let Some(existing) = self.phrases.get(&key) {
            let collision = IndexCollision {
                key,
                kept: existing.path().to_path_buf(),
                ignored: path,
            };
            self.collisions.push(collision.clone());
            return Err(collision);
        }

        let asset = SoundAsset::new(key.clone(), path, source, self.next_order);
        self.next_order += 1;

        self.paths
            .entry(path_key(relative))
            .or_insert_with(|| asset.clone());
        Ok(self.phrases.entry(key).or_insert(asset))
    }

    /// 按规范化短语查找
    pub fn lookup_phrase(&self, key: &PhraseKey) -> Option<&SoundAsset> {
        self.phrases.get(key)
    }

    /// 按分类路径查找（如 `digits/3`）
    pub fn lookup_category(&self, relative: &str) -> Option<&SoundAsset> {
        self.phrases.get(&PhraseKey::from_path(relative))
    }

    /// 精确引用查找：先按相对路径，再按规范化短语
    pub fn lookup_exact(&self, reference: &str) -> Option<&SoundAsset> {
        self.paths
            .get(&path_key(reference))
            .or_else(|| self.phrases.get(&PhraseKey::from_path(reference)))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn collisions(&self) -> &[IndexCollision] {
        &self.collisions
    }

    /// 指定来源的素材数量
    pub fn count_by_source(&self, source: SoundSource) -> usize {
        self.phrases
            .values()
            .filter(|asset| asset.source() == source)
            .count()
    }

    /// 按 key 排序的全部素材
    pub fn assets(&self) -> Vec<&SoundAsset> {
        let mut assets: Vec<&SoundAsset> = self.phrases.values().collect();
        assets.sort_by(|a, b| a.key().cmp(b.key()));
        assets
    }
}

fn path_key(relative: &str) -> String {
    relative
        .replace('\\', "/")
        .split('/')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_writer_wins() {
        let mut index = SoundIndex::new();
        index
            .insert("rpt/connected-to", PathBuf::from("/base/rpt/connected-to.ul"), SoundSource::Base)
            .unwrap();

        let collision = index
            .insert("connected_to", PathBuf::from("/custom/connected_to.ul"), SoundSource::Custom)
            .unwrap_err();

        assert_eq!(collision.key.as_str(), "connected to");
        assert_eq!(collision.kept, PathBuf::from("/base/rpt/connected-to.ul"));
        assert_eq!(collision.ignored, PathBuf::from("/custom/connected_to.ul"));

        let asset = index
            .lookup_phrase(&PhraseKey::from_text("Connected To"))
            .unwrap();
        assert_eq!(asset.source(), SoundSource::Base);
        assert_eq!(index.collisions().len(), 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_lookup_exact_by_path_and_phrase() {
        let mut index = SoundIndex::new();
        index
            .insert("rpt/connected-to", PathBuf::from("/base/rpt/connected-to.ul"), SoundSource::Base)
            .unwrap();

        assert!(index.lookup_exact("rpt/connected-to").is_some());
        assert!(index.lookup_exact("RPT/Connected-To").is_some());
        assert!(index.lookup_exact("connected to").is_some());
        assert!(index.lookup_exact("rpt/disconnected").is_none());
    }

    #[test]
    fn test_category_lookup() {
        let mut index = SoundIndex::new();
        index
            .insert("digits/3", PathBuf::from("/base/digits/3.ul"), SoundSource::Base)
            .unwrap();
        index
            .insert("3", PathBuf::from("/custom/numbers/3.ul"), SoundSource::Custom)
            .unwrap();

        assert_eq!(
            index.lookup_category("digits/3").unwrap().path(),
            std::path::Path::new("/base/digits/3.ul")
        );
        assert_eq!(index.count_by_source(SoundSource::Custom), 1);
    }

    #[test]
    fn test_discovery_order_is_recorded() {
        let mut index = SoundIndex::new();
        index.insert("hello", PathBuf::from("/a/hello.ul"), SoundSource::Base).unwrap();
        index.insert("world", PathBuf::from("/a/world.ul"), SoundSource::Base).unwrap();

        let keys: Vec<usize> = index.assets().iter().map(|a| a.order()).collect();
        assert_eq!(keys, vec![0, 1]);
    }
}
