/// Log levels for the processing engine
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Components of the processing engine
#[derive(Debug, Clone, Copy)]
pub enum Component {
    Pipeline,
    Db,
    Llm,
    Storage,
    Settings,
    Cli,
}

impl Component {
    fn as_str(&self) -> &'static str {
        match self {
            Component::Pipeline => "PIPELINE",
            Component::Db => "DB",
            Component::Llm => "LLM",
            Component::Storage => "STORAGE",
            Component::Settings => "SETTINGS",
            Component::Cli => "CLI",
        }
    }
}

/// Log a message tagged with its component
pub fn log(component: Component, level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => log::debug!("[{}] {}", component.as_str(), message),
        LogLevel::Info => log::info!("[{}] {}", component.as_str(), message),
        LogLevel::Warn => log::warn!("[{}] {}", component.as_str(), message),
        LogLevel::Error => log::error!("[{}] {}", component.as_str(), message),
    }
}

/// Log with additional context/details
pub fn log_with_context(component: Component, level: LogLevel, message: &str, context: &str) {
    log(component, level, &format!("{} - {}", message, context));
}

// Convenience functions
pub fn debug(component: Component, message: &str) {
    log(component, LogLevel::Debug, message);
}

pub fn info(component: Component, message: &str) {
    log(component, LogLevel::Info, message);
}

pub fn warn(component: Component, message: &str) {
    log(component, LogLevel::Warn, message);
}

pub fn error(component: Component, message: &str) {
    log(component, LogLevel::Error, message);
}
