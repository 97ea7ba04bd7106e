//! Deferred window geometry.
//!
//! Window managers decorate and resize new windows asynchronously, and any
//! geometry applied before they finish is moved or ignored. A
//! [`GeometrySettler`] is polled from the event loop until the window has
//! been decorated, then applies the saved rectangle (kept on screen), waits
//! for the size to take, and finally restores panel scroll positions.
//!
//! Every state has a tick budget, so a window manager that never reports a
//! decoration cannot keep a settler alive forever.

use std::time::Duration;

use qegui_common::{PanelId, Point, Rect, WindowId};
use qegui_config::schema::SettleSettings;
use tracing::debug;

use crate::host::GeometryProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleState {
    /// Waiting for the content origin to differ from the frame origin.
    WaitDecoration,
    /// Geometry applied, waiting for the requested size to be honoured.
    WaitSize,
    Settled,
    Abandoned,
}

impl SettleState {
    pub fn is_finished(self) -> bool {
        matches!(self, SettleState::Settled | SettleState::Abandoned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleConfig {
    /// Ticks allowed in each waiting state.
    pub max_retries: u32,
    /// Minimum distance kept between a window edge and the screen's side.
    pub horizontal_margin: i32,
    pub vertical_margin: i32,
    pub poll_interval: Duration,
}

impl SettleConfig {
    pub fn from_settings(settings: &SettleSettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            horizontal_margin: settings.horizontal_margin,
            vertical_margin: settings.vertical_margin,
            poll_interval: Duration::from_millis(u64::from(settings.poll_interval_ms)),
        }
    }
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self::from_settings(&SettleSettings::default())
    }
}

/// Pull `target` back far enough that part of it stays reachable on `screen`.
///
/// Only the position changes. A window whose right edge is left of the
/// left limit is moved right, one whose left edge is past the right limit is
/// moved left; the top edge is kept between the top and bottom limits.
pub fn clamp_to_screen(target: Rect, screen: Rect, config: &SettleConfig) -> Rect {
    let limit_left = screen.left() + config.horizontal_margin;
    let limit_right = screen.right() - config.horizontal_margin;
    let limit_top = screen.top() + config.vertical_margin;
    let limit_bottom = screen.bottom() - config.vertical_margin;

    let mut r = target;
    if r.right() <= limit_left {
        r.move_right(limit_left);
    } else if r.left() >= limit_right {
        r.move_left(limit_right);
    }

    if r.top() <= limit_top {
        r.move_top(limit_top);
    } else if r.top() >= limit_bottom {
        r.move_top(limit_bottom);
    }
    r
}

#[derive(Debug)]
pub struct GeometrySettler {
    window: WindowId,
    target: Rect,
    applied: Option<Rect>,
    scrolls: Vec<(PanelId, Point)>,
    retries: u32,
    state: SettleState,
    config: SettleConfig,
}

impl GeometrySettler {
    pub fn new(window: WindowId, target: Rect, config: SettleConfig) -> Self {
        Self {
            window,
            target,
            applied: None,
            scrolls: Vec::new(),
            retries: 0,
            state: SettleState::WaitDecoration,
            config,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    /// Scroll offset to restore once the window has its final size.
    pub fn queue_scroll(&mut self, panel: PanelId, offset: Point) {
        self.scrolls.push((panel, offset));
    }

    pub fn state(&self) -> SettleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Advance by one poll.
    pub fn tick(&mut self, probe: &mut impl GeometryProbe) -> SettleState {
        match self.state {
            SettleState::WaitDecoration => self.wait_decoration(probe),
            SettleState::WaitSize => self.wait_size(probe),
            SettleState::Settled | SettleState::Abandoned => {}
        }
        self.state
    }

    fn wait_decoration(&mut self, probe: &mut impl GeometryProbe) {
        let (Some(content), Some(frame)) =
            (probe.geometry(self.window), probe.frame_geometry(self.window))
        else {
            self.abandon("window gone");
            return;
        };

        if content.origin() != frame.origin() {
            let rect = clamp_to_screen(self.target, probe.screen_geometry(), &self.config);
            probe.set_geometry(self.window, rect);
            self.applied = Some(rect);
            self.retries = 0;
            self.state = SettleState::WaitSize;
            debug!(window = %self.window, x = rect.x, y = rect.y, "Window decorated, geometry applied");
            return;
        }

        self.retries += 1;
        if self.retries >= self.config.max_retries {
            // Never decorated: apply what was saved and stop waiting.
            probe.set_geometry(self.window, self.target);
            self.applied = Some(self.target);
            self.abandon("no decoration");
        }
    }

    fn wait_size(&mut self, probe: &mut impl GeometryProbe) {
        let Some(content) = probe.geometry(self.window) else {
            self.abandon("window gone");
            return;
        };
        let wanted = self.applied.unwrap_or(self.target).size();

        if content.size() == wanted {
            for (panel, offset) in self.scrolls.drain(..) {
                probe.set_scroll_offset(panel, offset);
            }
            self.state = SettleState::Settled;
            debug!(window = %self.window, "Window geometry settled");
            return;
        }

        self.retries += 1;
        if self.retries >= self.config.max_retries {
            self.abandon("size not honoured");
        }
    }

    fn abandon(&mut self, reason: &str) {
        debug!(window = %self.window, reason, retries = self.retries, "Geometry settling abandoned");
        self.scrolls.clear();
        self.state = SettleState::Abandoned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };

    /// Window manager double: decorates after `decorate_after` polls of the
    /// frame, and optionally refuses to resize.
    struct FakeWm {
        content: Option<Rect>,
        polls: u32,
        decorate_after: Option<u32>,
        honour_size: bool,
        set_calls: Vec<Rect>,
        scrolls: HashMap<PanelId, Point>,
    }

    impl FakeWm {
        fn new(decorate_after: Option<u32>) -> Self {
            Self {
                content: Some(Rect::new(0, 0, 200, 100)),
                polls: 0,
                decorate_after,
                honour_size: true,
                set_calls: Vec::new(),
                scrolls: HashMap::new(),
            }
        }
    }

    impl GeometryProbe for FakeWm {
        fn geometry(&self, _: WindowId) -> Option<Rect> {
            self.content
        }

        fn frame_geometry(&self, _: WindowId) -> Option<Rect> {
            let content = self.content?;
            let decorated = self.decorate_after.is_some_and(|n| self.polls >= n);
            Some(if decorated {
                Rect::new(content.x, content.y - 20, content.width, content.height + 20)
            } else {
                content
            })
        }

        fn set_geometry(&mut self, _: WindowId, rect: Rect) {
            self.set_calls.push(rect);
            if let Some(content) = self.content.as_mut() {
                if self.honour_size {
                    *content = rect;
                } else {
                    content.x = rect.x;
                    content.y = rect.y;
                }
            }
        }

        fn screen_geometry(&self) -> Rect {
            SCREEN
        }

        fn set_scroll_offset(&mut self, panel: PanelId, offset: Point) {
            self.scrolls.insert(panel, offset);
        }
    }

    fn run(settler: &mut GeometrySettler, wm: &mut FakeWm, limit: u32) -> u32 {
        for tick in 1..=limit {
            wm.polls += 1;
            if settler.tick(wm).is_finished() {
                return tick;
            }
        }
        limit
    }

    #[test]
    fn decorated_window_settles_and_scrolls() {
        let mut wm = FakeWm::new(Some(3));
        let target = Rect::new(300, 200, 800, 600);
        let mut settler = GeometrySettler::new(WindowId(0), target, SettleConfig::default());
        settler.queue_scroll(PanelId(4), Point::new(0, 120));

        run(&mut settler, &mut wm, 50);
        assert_eq!(settler.state(), SettleState::Settled);
        assert_eq!(wm.set_calls, vec![target]);
        assert_eq!(wm.scrolls.get(&PanelId(4)), Some(&Point::new(0, 120)));
    }

    #[test]
    fn never_decorated_window_abandons_with_saved_rect() {
        let mut wm = FakeWm::new(None);
        // Far off screen, so clamping would have moved it.
        let target = Rect::new(-5000, -5000, 640, 480);
        let mut settler = GeometrySettler::new(WindowId(0), target, SettleConfig::default());
        settler.queue_scroll(PanelId(1), Point::new(10, 10));

        let ticks = run(&mut settler, &mut wm, 5000);
        assert_eq!(settler.state(), SettleState::Abandoned);
        assert!(ticks <= 1000, "abandoned after {ticks} ticks");
        assert_eq!(wm.set_calls, vec![target]);
        assert!(wm.scrolls.is_empty());
    }

    #[test]
    fn ignored_resize_abandons_and_keeps_geometry() {
        let mut wm = FakeWm::new(Some(0));
        wm.honour_size = false;
        let config = SettleConfig {
            max_retries: 20,
            ..Default::default()
        };
        let mut settler = GeometrySettler::new(WindowId(0), Rect::new(300, 200, 800, 600), config);
        settler.queue_scroll(PanelId(1), Point::new(0, 5));

        let ticks = run(&mut settler, &mut wm, 100);
        assert_eq!(settler.state(), SettleState::Abandoned);
        // One tick to apply, then the full budget again in WaitSize.
        assert_eq!(ticks, 21);
        assert_eq!(wm.set_calls.len(), 1);
        assert!(wm.scrolls.is_empty());
    }

    #[test]
    fn vanished_window_abandons_without_applying() {
        let mut wm = FakeWm::new(Some(0));
        wm.content = None;
        let mut settler =
            GeometrySettler::new(WindowId(0), Rect::new(0, 0, 10, 10), SettleConfig::default());
        assert_eq!(settler.tick(&mut wm), SettleState::Abandoned);
        assert!(wm.set_calls.is_empty());
    }

    #[test]
    fn finished_settler_ignores_ticks() {
        let mut wm = FakeWm::new(Some(0));
        let mut settler =
            GeometrySettler::new(WindowId(0), Rect::new(300, 300, 200, 100), SettleConfig::default());
        run(&mut settler, &mut wm, 10);
        assert!(settler.is_finished());
        let calls = wm.set_calls.len();
        settler.tick(&mut wm);
        assert_eq!(wm.set_calls.len(), calls);
    }

    #[test]
    fn clamp_pulls_windows_back_on_screen() {
        let config = SettleConfig::default();

        let off_left = clamp_to_screen(Rect::new(-1000, 300, 400, 300), SCREEN, &config);
        assert_eq!(off_left.right(), 100);
        assert_eq!(off_left.y, 300);

        let off_right = clamp_to_screen(Rect::new(1900, 300, 400, 300), SCREEN, &config);
        assert_eq!(off_right.x, SCREEN.right() - 100);

        let above = clamp_to_screen(Rect::new(200, -40, 400, 300), SCREEN, &config);
        assert_eq!(above.y, 50);

        let below = clamp_to_screen(Rect::new(200, 1070, 400, 300), SCREEN, &config);
        assert_eq!(below.y, SCREEN.bottom() - 50);
    }

    #[test]
    fn clamp_keeps_visible_windows() {
        let config = SettleConfig::default();
        let r = Rect::new(300, 200, 800, 600);
        assert_eq!(clamp_to_screen(r, SCREEN, &config), r);

        let moved = clamp_to_screen(Rect::new(-9000, 9000, 800, 600), SCREEN, &config);
        assert_eq!(moved.size(), r.size());
    }

    #[test]
    fn config_from_settings() {
        let settings = SettleSettings {
            poll_interval_ms: 25,
            max_retries: 10,
            horizontal_margin: 5,
            vertical_margin: 6,
        };
        let config = SettleConfig::from_settings(&settings);
        assert_eq!(config.poll_interval, Duration::from_millis(25));
        assert_eq!(config.max_retries, 10);
        assert_eq!(SettleConfig::default().max_retries, 1000);
    }
}
