use serde::{Deserialize, Serialize};

use crate::config::{ConfigSerializer, ContentProvider, YamlConfigSerializer};

pub const MAX_HIGH_SCORES: usize = 10;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    pub date: String,
}

impl HighScoreEntry {
    pub fn today(score: u32) -> Self {
        Self {
            score,
            date: chrono::Local::now().format(DATE_FORMAT).to_string(),
        }
    }
}

/// Best scores, highest first. Equal scores keep their arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreTable {
    #[serde(default)]
    pub entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `score` would make it onto the table.
    pub fn qualifies(&self, score: u32) -> bool {
        match self.entries.get(MAX_HIGH_SCORES - 1) {
            Some(last) => score > last.score,
            None => true,
        }
    }

    /// Inserts and trims to the table size. Returns the rank, or `None` if
    /// the entry did not make the cut.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Persistent storage for the table. Consulted only when a round ends.
pub trait HighScoreStore: Send + 'static {
    fn load(&self) -> Result<HighScoreTable, String>;
    fn save(&self, table: &HighScoreTable) -> Result<(), String>;

    fn get_high_scores(&self) -> Result<Vec<HighScoreEntry>, String> {
        Ok(self.load()?.entries)
    }

    /// Records a finished round dated today. True when it made the table.
    fn add_high_score(&self, score: u32) -> Result<bool, String> {
        Ok(self.add_entry(HighScoreEntry::today(score))?.is_some())
    }

    /// Returns the rank when the entry qualified.
    fn add_entry(&self, entry: HighScoreEntry) -> Result<Option<usize>, String> {
        let mut table = self.load()?;
        let rank = table.insert(entry);
        if rank.is_some() {
            self.save(&table)?;
        }
        Ok(rank)
    }
}

pub struct YamlHighScoreStore<TContentProvider: ContentProvider> {
    content_provider: TContentProvider,
    serializer: YamlConfigSerializer,
}

impl<TContentProvider: ContentProvider> YamlHighScoreStore<TContentProvider> {
    pub fn new(content_provider: TContentProvider) -> Self {
        Self {
            content_provider,
            serializer: YamlConfigSerializer::new(),
        }
    }
}

impl<TContentProvider> HighScoreStore for YamlHighScoreStore<TContentProvider>
where
    TContentProvider: ContentProvider + Send + 'static,
{
    fn load(&self) -> Result<HighScoreTable, String> {
        let Some(content) = self.content_provider.get_content()? else {
            return Ok(HighScoreTable::new());
        };
        let mut table: HighScoreTable = self.serializer.deserialize(&content)?;
        table.entries.sort_by(|a, b| b.score.cmp(&a.score));
        table.entries.truncate(MAX_HIGH_SCORES);
        Ok(table)
    }

    fn save(&self, table: &HighScoreTable) -> Result<(), String> {
        let content = self.serializer.serialize(table)?;
        self.content_provider.set_content(&content)
    }
}
