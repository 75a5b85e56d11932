//! Exclusive display mode between the 3D scene and the fallback preview.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    SceneView,
    FallbackView,
}

/// A preview surface that can be shown, hidden and emptied.
pub trait Surface {
    fn show(&mut self);
    fn hide(&mut self);
    /// Frees whatever the surface currently displays.
    fn release(&mut self);
}

pub struct ModeSwitcher<S, F> {
    scene: S,
    fallback: F,
    active: Option<DisplayMode>,
}

impl<S: Surface, F: Surface> ModeSwitcher<S, F> {
    /// Both surfaces start hidden, no mode is active.
    pub fn new(mut scene: S, mut fallback: F) -> Self {
        scene.hide();
        fallback.hide();
        Self {
            scene,
            fallback,
            active: None,
        }
    }

    /// Activates `mode`. Returns `false` when it was already active, in which
    /// case nothing is hidden or released.
    pub fn set_mode(&mut self, mode: DisplayMode) -> bool {
        if self.active == Some(mode) {
            return false;
        }
        let previous = self.active.replace(mode);
        match mode {
            DisplayMode::SceneView => {
                self.fallback.hide();
                if previous == Some(DisplayMode::FallbackView) {
                    self.fallback.release();
                }
                self.scene.show();
            }
            DisplayMode::FallbackView => {
                self.scene.hide();
                if previous == Some(DisplayMode::SceneView) {
                    self.scene.release();
                }
                self.fallback.show();
            }
        }
        true
    }

    #[inline]
    pub fn active(&self) -> Option<DisplayMode> {
        self.active
    }

    /// Whether the scene should receive per-frame updates.
    #[inline]
    pub fn renders_scene(&self) -> bool {
        self.active == Some(DisplayMode::SceneView)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    pub fn fallback_mut(&mut self) -> &mut F {
        &mut self.fallback
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Surface that only counts what happens to it.
    #[derive(Debug, Default)]
    pub(crate) struct CountingSurface {
        pub visible: bool,
        pub shows: usize,
        pub hides: usize,
        pub releases: usize,
    }

    impl Surface for CountingSurface {
        fn show(&mut self) {
            self.visible = true;
            self.shows += 1;
        }

        fn hide(&mut self) {
            self.visible = false;
            self.hides += 1;
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    fn switcher() -> ModeSwitcher<CountingSurface, CountingSurface> {
        ModeSwitcher::new(CountingSurface::default(), CountingSurface::default())
    }

    #[test]
    fn test_starts_hidden() {
        let modes = switcher();
        assert_eq!(modes.active(), None);
        assert!(!modes.scene().visible);
        assert!(!modes.fallback().visible);
        assert!(!modes.renders_scene());
    }

    #[test]
    fn test_switch_releases_previous() {
        let mut modes = switcher();
        assert!(modes.set_mode(DisplayMode::FallbackView));
        assert!(modes.fallback().visible);
        assert!(!modes.scene().visible);
        assert_eq!(modes.scene().releases, 0);

        assert!(modes.set_mode(DisplayMode::SceneView));
        assert!(modes.scene().visible);
        assert!(!modes.fallback().visible);
        assert_eq!(modes.fallback().releases, 1);
        assert!(modes.renders_scene());

        assert!(modes.set_mode(DisplayMode::FallbackView));
        assert_eq!(modes.scene().releases, 1);
        assert!(!modes.renders_scene());
    }

    #[test]
    fn test_same_mode_twice_is_noop() {
        let mut modes = switcher();
        modes.set_mode(DisplayMode::FallbackView);
        modes.set_mode(DisplayMode::SceneView);
        let hides = modes.fallback().hides;

        assert!(!modes.set_mode(DisplayMode::SceneView));
        assert_eq!(modes.fallback().releases, 1);
        assert_eq!(modes.fallback().hides, hides);
        assert_eq!(modes.scene().shows, 1);
    }
}
