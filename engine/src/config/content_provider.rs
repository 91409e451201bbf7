use std::io::ErrorKind;
use std::sync::{Arc, Mutex};

/// Raw text storage behind configuration and the high-score table.
pub trait ContentProvider {
    fn get_content(&self) -> Result<Option<String>, String>;
    fn set_content(&self, content: &str) -> Result<(), String>;
}

pub struct FileContentProvider {
    file_path: String,
}

impl FileContentProvider {
    pub fn new(file_path: String) -> Self {
        Self { file_path }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

impl ContentProvider for FileContentProvider {
    fn get_content(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => Ok(Some(content)),
            Err(err) => match err.kind() {
                ErrorKind::NotFound => Ok(None),
                _ => Err(format!("Failed to read {}: {}", self.file_path, err)),
            },
        }
    }

    fn set_content(&self, content: &str) -> Result<(), String> {
        std::fs::write(self.file_path.as_str(), content)
            .map_err(|e| format!("Failed to write {}: {}", self.file_path, e))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryContentProvider {
    content: Arc<Mutex<Option<String>>>,
}

impl InMemoryContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: &str) -> Self {
        Self {
            content: Arc::new(Mutex::new(Some(content.to_string()))),
        }
    }
}

impl ContentProvider for InMemoryContentProvider {
    fn get_content(&self) -> Result<Option<String>, String> {
        let guard = self
            .content
            .lock()
            .map_err(|_| "In-memory content lock poisoned".to_string())?;
        Ok(guard.clone())
    }

    fn set_content(&self, content: &str) -> Result<(), String> {
        let mut guard = self
            .content
            .lock()
            .map_err(|_| "In-memory content lock poisoned".to_string())?;
        *guard = Some(content.to_string());
        Ok(())
    }
}
