use crate::logger::{error, Component};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Media storage settings
    pub storage: StorageSettings,

    // Remote LLM settings
    pub llm: LlmSettings,

    // Pipeline settings
    pub pipeline: PipelineSettings,

    // Boundary access settings
    pub access: AccessSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub upload_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub invoke_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub min_transcription_len: usize,
    pub background_enrich_threshold: usize,
    pub flashcard_count: usize,
    pub quiz_count: usize,
    pub prompt_transcript_max_chars: usize,
    pub list_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
    pub access_code: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            llm: LlmSettings::default(),
            pipeline: PipelineSettings::default(),
            access: AccessSettings::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_url: "http://localhost:8000/api/upload".to_string(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            invoke_url: "http://localhost:8000/api/invoke".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_transcription_len: 10,
            background_enrich_threshold: 50,
            flashcard_count: 8,
            quiz_count: 6,
            prompt_transcript_max_chars: 3000,
            list_limit: 100,
        }
    }
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self { access_code: None }
    }
}

pub struct SettingsManager {
    settings_path: PathBuf,
    settings: AppSettings,
}

impl SettingsManager {
    pub fn new(app_data_dir: &Path) -> Result<Self, String> {
        let settings_path = app_data_dir.join("settings.json");

        // Load settings or create default
        let settings = match fs::read_to_string(&settings_path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                error(
                    Component::Settings,
                    &format!("Failed to parse settings.json: {}, using defaults", e),
                );
                AppSettings::default()
            }),
            Err(_) => {
                let default_settings = AppSettings::default();

                // Save default settings
                if let Ok(json) = serde_json::to_string_pretty(&default_settings) {
                    let _ = fs::write(&settings_path, json);
                }

                default_settings
            }
        };

        Ok(Self {
            settings_path,
            settings,
        })
    }

    pub fn get(&self) -> &AppSettings {
        &self.settings
    }

    pub fn update<F>(&mut self, updater: F) -> Result<(), String>
    where
        F: FnOnce(&mut AppSettings),
    {
        updater(&mut self.settings);
        self.save()
    }

    pub fn save(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&self.settings_path, json)
            .map_err(|e| format!("Failed to save settings: {}", e))?;

        Ok(())
    }

    pub fn reload(&mut self) -> Result<(), String> {
        match fs::read_to_string(&self.settings_path) {
            Ok(contents) => {
                self.settings = serde_json::from_str(&contents)
                    .map_err(|e| format!("Failed to parse settings: {}", e))?;
                Ok(())
            }
            Err(e) => Err(format!("Failed to read settings: {}", e)),
        }
    }
}
