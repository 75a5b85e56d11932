use crate::error::{Result, ViewError};
use crate::mode::DisplayMode;

/// File formats the page knows what to do with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Step,
    Sldprt,
}

impl FileKind {
    /// Value of the file input's `accept` attribute.
    pub const ACCEPT: &'static str = ".stp,.step,.sldprt";

    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = extension(name)
            .ok_or_else(|| ViewError::UnsupportedFormat(name.to_owned()))?
            .to_ascii_lowercase();
        match ext.as_str() {
            "stp" | "step" => Ok(FileKind::Step),
            "sldprt" => Ok(FileKind::Sldprt),
            _ => Err(ViewError::UnsupportedFormat(ext)),
        }
    }

    pub fn display_mode(self) -> DisplayMode {
        match self {
            FileKind::Step => DisplayMode::SceneView,
            FileKind::Sldprt => DisplayMode::FallbackView,
        }
    }

    /// Only formats without a real importer offer the conversion action.
    pub fn is_convertible(self) -> bool {
        matches!(self, FileKind::Sldprt)
    }
}

/// Text after the last `.`, if any.
pub fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// `name` without its trailing `.ext`. The extension may not contain `/`.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(FileKind::from_file_name("gear.stp"), Ok(FileKind::Step));
        assert_eq!(FileKind::from_file_name("Gear.STEP"), Ok(FileKind::Step));
        assert_eq!(FileKind::from_file_name("a.b.step"), Ok(FileKind::Step));
        assert_eq!(FileKind::from_file_name("part.SldPrt"), Ok(FileKind::Sldprt));
    }

    #[test]
    fn test_unsupported_names() {
        assert_eq!(
            FileKind::from_file_name("plan.dwg"),
            Err(ViewError::UnsupportedFormat("dwg".into()))
        );
        assert!(matches!(
            FileKind::from_file_name("step"),
            Err(ViewError::UnsupportedFormat(_))
        ));
        assert!(FileKind::from_file_name("model.").is_err());
    }

    #[test]
    fn test_modes() {
        assert_eq!(FileKind::Step.display_mode(), DisplayMode::SceneView);
        assert_eq!(FileKind::Sldprt.display_mode(), DisplayMode::FallbackView);
        assert!(FileKind::Sldprt.is_convertible());
        assert!(!FileKind::Step.is_convertible());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("part.sldprt"), "part");
        assert_eq!(file_stem("my.part.sldprt"), "my.part");
        assert_eq!(file_stem("noext"), "noext");
        assert_eq!(file_stem("dir.v2/noext"), "dir.v2/noext");
        assert_eq!(file_stem("trailing."), "trailing.");
    }
}
