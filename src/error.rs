pub type DweetResult<T> = Result<T, DweetError>;

/// Every failure an embedded dweet can surface. Nothing here is retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DweetError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("target not found: {0}")]
    TargetNotFound(String),

    #[error("compile error: {0}")]
    Compile(String),

    #[error("runtime script error: {0}")]
    RuntimeScript(String),

    #[error("host error: {0}")]
    Host(String),
}

impl DweetError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn target_not_found(id: &str) -> Self {
        Self::TargetNotFound(format!(
            "no element with id `{id}` to put the canvas in (did you get the id wrong?)"
        ))
    }

    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::RuntimeScript(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Name used for the `name` property of the thrown JS error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "ConfigurationError",
            Self::TargetNotFound(_) => "TargetNotFoundError",
            Self::Compile(_) => "CompileError",
            Self::RuntimeScript(_) => "RuntimeScriptError",
            Self::Host(_) => "HostError",
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<DweetError> for wasm_bindgen::JsValue {
    fn from(err: DweetError) -> Self {
        let js = js_sys::Error::new(&err.to_string());
        js.set_name(err.kind());
        js.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(DweetError::configuration("x")
            .to_string()
            .starts_with("configuration error:"));
        assert!(DweetError::compile("x").to_string().starts_with("compile error:"));
        assert!(DweetError::runtime("x")
            .to_string()
            .starts_with("runtime script error:"));
        assert!(DweetError::host("x").to_string().starts_with("host error:"));
    }

    #[test]
    fn missing_target_names_the_id() {
        let err = DweetError::target_not_found("stage");
        assert_eq!(err.kind(), "TargetNotFoundError");
        assert!(err.to_string().contains("`stage`"));
    }
}
