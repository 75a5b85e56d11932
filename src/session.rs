//! State of one page: the selected file, the active preview surface and any
//! pending load or conversion.

use crate::convert::ConvertedFile;
use crate::error::{Result, ViewError};
use crate::file_kind::FileKind;
use crate::mode::{DisplayMode, ModeSwitcher, Surface};
use crate::task::{TaskSlot, TaskToken};

/// Snapshot of what the controls around the previews should show.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    pub file_name: Option<String>,
    pub mode: Option<DisplayMode>,
    pub loading: bool,
    pub converting: bool,
    pub convert_visible: bool,
    pub download: Option<ConvertedFile>,
}

/// Result of a supported file selection. The caller runs the load for `kind`
/// and reports back with `token`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub kind: FileKind,
    pub token: TaskToken,
}

pub struct Session<S, F> {
    modes: ModeSwitcher<S, F>,
    file_name: Option<String>,
    kind: Option<FileKind>,
    loading: bool,
    convert_visible: bool,
    download: Option<ConvertedFile>,
    load: TaskSlot,
    conversion: TaskSlot,
}

impl<S: Surface, F: Surface> Session<S, F> {
    pub fn new(scene: S, fallback: F) -> Self {
        Self {
            modes: ModeSwitcher::new(scene, fallback),
            file_name: None,
            kind: None,
            loading: false,
            convert_visible: false,
            download: None,
            load: TaskSlot::new(),
            conversion: TaskSlot::new(),
        }
    }

    fn reset_ui(&mut self) {
        self.conversion.cancel();
        self.load.cancel();
        self.convert_visible = false;
        self.download = None;
        self.file_name = None;
        self.kind = None;
        self.loading = false;
    }

    /// Starts handling a newly picked file. Anything still pending from the
    /// previous file is superseded.
    pub fn select_file(&mut self, name: &str) -> Result<Selection> {
        self.reset_ui();
        let kind = FileKind::from_file_name(name)?;

        self.file_name = Some(name.to_owned());
        self.kind = Some(kind);
        self.loading = true;

        let mode = kind.display_mode();
        self.modes.set_mode(mode);
        match mode {
            DisplayMode::SceneView => self.modes.scene_mut().release(),
            DisplayMode::FallbackView => self.modes.fallback_mut().release(),
        }
        self.convert_visible = kind.is_convertible();

        Ok(Selection {
            kind,
            token: self.load.begin(),
        })
    }

    #[inline]
    pub fn is_load_current(&self, token: TaskToken) -> bool {
        self.load.is_current(token)
    }

    /// Reports the end of a load. Returns `None` when a newer selection has
    /// superseded it, so the outcome must be dropped.
    pub fn finish_load(&mut self, token: TaskToken, outcome: Result<()>) -> Option<Result<()>> {
        if !self.load.finish(token) {
            return None;
        }
        self.loading = false;
        if outcome.is_err() && self.kind == Some(FileKind::Step) {
            self.modes.scene_mut().release();
        }
        Some(outcome)
    }

    pub fn start_conversion(&mut self) -> Result<TaskToken> {
        let convertible = self.kind.map_or(false, FileKind::is_convertible);
        if !convertible || !self.convert_visible || self.conversion.is_pending() {
            return Err(ViewError::ConversionUnavailable);
        }
        self.convert_visible = false;
        Ok(self.conversion.begin())
    }

    /// Finishes a conversion and switches to the scene. Returns `None` when the
    /// conversion was superseded by another file selection.
    pub fn complete_conversion(&mut self, token: TaskToken) -> Option<ConvertedFile> {
        if !self.conversion.finish(token) {
            return None;
        }
        let source = self.file_name.as_deref()?;
        let converted = ConvertedFile::placeholder_for(source);

        self.modes.set_mode(DisplayMode::SceneView);
        self.modes.scene_mut().release();
        self.download = Some(converted.clone());
        Some(converted)
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            file_name: self.file_name.clone(),
            mode: self.modes.active(),
            loading: self.loading,
            converting: self.conversion.is_pending(),
            convert_visible: self.convert_visible,
            download: self.download.clone(),
        }
    }

    #[inline]
    pub fn renders_scene(&self) -> bool {
        self.modes.renders_scene()
    }

    pub fn modes(&self) -> &ModeSwitcher<S, F> {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeSwitcher<S, F> {
        &mut self.modes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::tests::CountingSurface;

    type TestSession = Session<CountingSurface, CountingSurface>;

    fn session() -> TestSession {
        Session::new(CountingSurface::default(), CountingSurface::default())
    }

    #[test]
    fn test_step_selection() {
        let mut session = session();
        let selection = session.select_file("gear.step").unwrap();
        assert_eq!(selection.kind, FileKind::Step);

        let ui = session.ui_state();
        assert!(ui.loading);
        assert!(!ui.convert_visible);
        assert_eq!(ui.mode, Some(DisplayMode::SceneView));
        assert!(session.renders_scene());

        assert_eq!(session.finish_load(selection.token, Ok(())), Some(Ok(())));
        assert!(!session.ui_state().loading);
    }

    #[test]
    fn test_failed_import_clears_scene() {
        let mut session = session();
        let selection = session.select_file("gear.stp").unwrap();
        let releases = session.modes().scene().releases;

        let err = ViewError::ImportFailure("broken".into());
        assert_eq!(
            session.finish_load(selection.token, Err(err.clone())),
            Some(Err(err))
        );
        assert_eq!(session.modes().scene().releases, releases + 1);
        assert!(!session.ui_state().loading);
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut session = session();
        let first = session.select_file("a.step").unwrap();
        let second = session.select_file("b.step").unwrap();

        assert!(!session.is_load_current(first.token));
        assert_eq!(session.finish_load(first.token, Ok(())), None);
        assert!(session.ui_state().loading);
        assert_eq!(session.finish_load(second.token, Ok(())), Some(Ok(())));
    }

    #[test]
    fn test_conversion_requires_sldprt() {
        let mut session = session();
        assert_eq!(
            session.start_conversion(),
            Err(ViewError::ConversionUnavailable)
        );
        session.select_file("gear.step").unwrap();
        assert_eq!(
            session.start_conversion(),
            Err(ViewError::ConversionUnavailable)
        );
    }

    #[test]
    fn test_conversion_runs_once() {
        let mut session = session();
        let selection = session.select_file("part.sldprt").unwrap();
        session.finish_load(selection.token, Ok(()));

        let token = session.start_conversion().unwrap();
        let ui = session.ui_state();
        assert!(ui.converting);
        assert!(!ui.convert_visible);
        assert!(session.start_conversion().is_err());

        let file = session.complete_conversion(token).unwrap();
        assert_eq!(file.file_name, "part.stp");
        assert_eq!(session.complete_conversion(token), None);

        let ui = session.ui_state();
        assert!(!ui.converting);
        assert_eq!(ui.mode, Some(DisplayMode::SceneView));
        assert_eq!(ui.download, Some(file));
        assert_eq!(session.modes().fallback().releases, 2);
    }

    #[test]
    fn test_new_selection_cancels_conversion() {
        let mut session = session();
        let selection = session.select_file("part.sldprt").unwrap();
        session.finish_load(selection.token, Ok(()));
        let token = session.start_conversion().unwrap();

        session.select_file("other.sldprt").unwrap();
        assert_eq!(session.complete_conversion(token), None);

        let ui = session.ui_state();
        assert_eq!(ui.file_name.as_deref(), Some("other.sldprt"));
        assert_eq!(ui.mode, Some(DisplayMode::FallbackView));
        assert!(ui.convert_visible);
        assert!(!ui.converting);
        assert_eq!(ui.download, None);
    }

    #[test]
    fn test_unsupported_keeps_surfaces_hidden() {
        let mut session = session();
        let err = session.select_file("plan.dwg").unwrap_err();
        assert_eq!(err, ViewError::UnsupportedFormat("dwg".into()));

        let ui = session.ui_state();
        assert_eq!(ui, UiState::default());
        assert!(!session.modes().scene().visible);
        assert!(!session.modes().fallback().visible);
        assert_eq!(session.modes().scene().releases, 0);
        assert_eq!(session.modes().fallback().releases, 0);
    }
}
