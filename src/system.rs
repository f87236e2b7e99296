//! System task: turns button signals into menu navigation.
//!
//! The system task is the only owner of the [`MenuTree`]. Each scheduling
//! pass takes at most one [`ButtonSignal`] from the button queue, applies
//! the matching navigation operation, and publishes the resulting view as
//! a [`ScreenDescriptor`] for the screen task.
//!
//! | Signal          | Operation      | Repaint     |
//! |-----------------|----------------|-------------|
//! | PARENT pressed  | `go_to_parent` | full        |
//! | UP pressed      | `move_up`      | cursor only |
//! | DOWN pressed    | `move_down`    | cursor only |
//! | SELECT pressed  | `select`       | full        |
//!
//! UP/DOWN become a full repaint when the selection scrolls the four-row
//! window over a longer menu. Any other signal (release edges) is consumed
//! without effect.

use core::array;

use crate::config::LCD_ROWS;
use crate::queue::EventQueue;
use crate::tick::TickCounter;
use crate::ui::menu::{label, MenuTree};
use crate::ui::screen::ScreenDescriptor;
use crate::ui::{ButtonId, ButtonSignal, Edge};

/// Coarse activity state of the system task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemStatus {
    #[default]
    Idle,
    Active,
}

/// Request to change [`SystemStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusRequest {
    Idle,
    Active,
}

impl SystemStatus {
    /// Next status given the pending request, if any.
    pub fn on_request(self, request: Option<StatusRequest>) -> SystemStatus {
        match (self, request) {
            (SystemStatus::Idle, Some(StatusRequest::Active)) => SystemStatus::Active,
            (SystemStatus::Active, Some(StatusRequest::Idle)) => SystemStatus::Idle,
            (status, _) => status,
        }
    }
}

/// Navigation operation bound to a button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Navigation {
    Parent,
    Up,
    Down,
    Select,
}

impl Navigation {
    fn from_signal(signal: ButtonSignal) -> Option<Self> {
        match (signal.button, signal.edge) {
            (ButtonId::Parent, Edge::Down) => Some(Navigation::Parent),
            (ButtonId::Up, Edge::Down) => Some(Navigation::Up),
            (ButtonId::Down, Edge::Down) => Some(Navigation::Down),
            (ButtonId::Select, Edge::Down) => Some(Navigation::Select),
            _ => None,
        }
    }

    /// Entering or leaving a menu changes every row.
    fn needs_full_repaint(self) -> bool {
        matches!(self, Navigation::Parent | Navigation::Select)
    }
}

/// Menu state plus the status machine.
pub struct System {
    menu: MenuTree,
    status: SystemStatus,
}

impl System {
    /// System over the default menu layout.
    pub fn new() -> Self {
        Self::with_menu(MenuTree::with_default_layout())
    }

    /// System over a custom tree.
    pub fn with_menu(menu: MenuTree) -> Self {
        Self {
            menu,
            status: SystemStatus::Idle,
        }
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    pub fn status(&self) -> SystemStatus {
        self.status
    }

    /// Publish the initial screen.
    pub fn start(&mut self, screen: &mut EventQueue<ScreenDescriptor>) {
        log_info!(
            "system task: {=usize} menus, status {}",
            self.menu.menu_count(),
            self.status
        );
        screen.push(self.build_descriptor(true));
    }

    /// Drain this task's ticks, handling at most one signal per tick.
    ///
    /// Returns the number of passes executed.
    pub fn update(
        &mut self,
        ticks: &TickCounter,
        buttons: &mut EventQueue<ButtonSignal>,
        screen: &mut EventQueue<ScreenDescriptor>,
    ) -> u32 {
        ticks.drain(|| self.step(buttons, screen))
    }

    /// One scheduling pass.
    pub fn step(
        &mut self,
        buttons: &mut EventQueue<ButtonSignal>,
        screen: &mut EventQueue<ScreenDescriptor>,
    ) {
        if let Some(signal) = buttons.pop() {
            self.handle(signal, screen);
        }

        // The pending request is consumed above, so nothing reaches the
        // status machine here.
        self.status = self.status.on_request(None);
    }

    fn handle(&mut self, signal: ButtonSignal, screen: &mut EventQueue<ScreenDescriptor>) {
        let Some(nav) = Navigation::from_signal(signal) else {
            log_debug!("system: ignoring {}", signal);
            return;
        };

        let top = self.first_visible_row();
        match nav {
            Navigation::Parent => self.menu.go_to_parent(),
            Navigation::Up => self.menu.move_up(),
            Navigation::Down => self.menu.move_down(),
            Navigation::Select => self.menu.select(),
        }

        // Scrolling changes the row texts, not just the marker.
        let scrolled = self.first_visible_row() != top;
        let descriptor = self.build_descriptor(nav.needs_full_repaint() || scrolled);
        if !screen.push(descriptor) {
            log_warn!("system: screen queue full");
        }
    }

    /// Menu index shown on the top LCD row. The window starts at the first
    /// item and scrolls just enough to keep the selection on the last row.
    pub fn first_visible_row(&self) -> usize {
        self.menu.current_index().saturating_sub(LCD_ROWS - 1)
    }

    /// Describe the visible part of the current menu. `selected` is
    /// relative to the top row, so it is always below `LCD_ROWS`.
    pub fn build_descriptor(&self, full_repaint: bool) -> ScreenDescriptor {
        let top = self.first_visible_row();
        ScreenDescriptor {
            lines: array::from_fn::<_, LCD_ROWS, _>(|row| {
                self.menu.item_label(top + row).map(label).unwrap_or_default()
            }),
            selected: self.menu.current_index() - top,
            full_repaint,
        }
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::menu::MenuId;

    fn system() -> (System, EventQueue<ButtonSignal>, EventQueue<ScreenDescriptor>) {
        (System::new(), EventQueue::new(), EventQueue::new())
    }

    fn lines(d: &ScreenDescriptor) -> [&str; 4] {
        [
            d.lines[0].as_str(),
            d.lines[1].as_str(),
            d.lines[2].as_str(),
            d.lines[3].as_str(),
        ]
    }

    #[test]
    fn start_publishes_root_menu() {
        let (mut sys, _, mut screen) = system();
        sys.start(&mut screen);

        let d = screen.pop().unwrap();
        assert!(d.full_repaint);
        assert_eq!(d.selected, 0);
        assert_eq!(
            lines(&d),
            ["Menu Item 1", "Menu Item 2", "Menu Item 3", "Menu Item 4"]
        );
        assert!(screen.is_empty());
    }

    #[test]
    fn down_press_moves_cursor() {
        let (mut sys, mut buttons, mut screen) = system();
        let ticks = TickCounter::new();
        buttons.push(ButtonSignal::down(ButtonId::Down));
        ticks.add(1);

        assert_eq!(sys.update(&ticks, &mut buttons, &mut screen), 1);

        let d = screen.pop().unwrap();
        assert!(!d.full_repaint);
        assert_eq!(d.selected, 1);
        assert_eq!(
            lines(&d),
            ["Menu Item 1", "Menu Item 2", "Menu Item 3", "Menu Item 4"]
        );
    }

    #[test]
    fn select_enters_submenu_with_blank_fourth_row() {
        let (mut sys, mut buttons, mut screen) = system();
        buttons.push(ButtonSignal::down(ButtonId::Down));
        buttons.push(ButtonSignal::down(ButtonId::Select));
        sys.step(&mut buttons, &mut screen);
        sys.step(&mut buttons, &mut screen);

        screen.pop();
        let d = screen.pop().unwrap();
        assert!(d.full_repaint);
        assert_eq!(d.selected, 0);
        assert_eq!(
            lines(&d),
            ["Submenu 2 Item 1", "Submenu 2 Item 2", "Submenu 2 Item 3", ""]
        );
        assert_ne!(sys.menu().current(), MenuId::ROOT);
    }

    #[test]
    fn parent_returns_with_selection_kept() {
        let (mut sys, mut buttons, mut screen) = system();
        for id in [ButtonId::Down, ButtonId::Down, ButtonId::Select, ButtonId::Parent] {
            buttons.push(ButtonSignal::down(id));
        }
        for _ in 0..4 {
            sys.step(&mut buttons, &mut screen);
        }

        assert_eq!(screen.len(), 4);
        let d = (0..4).filter_map(|_| screen.pop()).last().unwrap();
        assert!(d.full_repaint);
        assert_eq!(d.selected, 2);
        assert_eq!(d.lines[0].as_str(), "Menu Item 1");
        assert_eq!(sys.menu().current(), MenuId::ROOT);
    }

    #[test]
    fn parent_at_root_still_repaints() {
        let (mut sys, mut buttons, mut screen) = system();
        buttons.push(ButtonSignal::down(ButtonId::Parent));
        sys.step(&mut buttons, &mut screen);

        let d = screen.pop().unwrap();
        assert!(d.full_repaint);
        assert_eq!(sys.menu().current(), MenuId::ROOT);
    }

    #[test]
    fn release_edges_are_ignored() {
        let (mut sys, mut buttons, mut screen) = system();
        buttons.push(ButtonSignal::up(ButtonId::Down));
        sys.step(&mut buttons, &mut screen);

        assert!(buttons.is_empty());
        assert!(screen.is_empty());
        assert_eq!(sys.menu().current_index(), 0);
    }

    #[test]
    fn one_signal_per_pass() {
        let (mut sys, mut buttons, mut screen) = system();
        let ticks = TickCounter::new();
        for _ in 0..3 {
            buttons.push(ButtonSignal::down(ButtonId::Down));
        }

        ticks.add(2);
        assert_eq!(sys.update(&ticks, &mut buttons, &mut screen), 2);
        assert_eq!(buttons.len(), 1);
        assert_eq!(screen.len(), 2);
        assert_eq!(sys.menu().current_index(), 2);
    }

    #[test]
    fn no_ticks_no_work() {
        let (mut sys, mut buttons, mut screen) = system();
        let ticks = TickCounter::new();
        buttons.push(ButtonSignal::down(ButtonId::Down));

        assert_eq!(sys.update(&ticks, &mut buttons, &mut screen), 0);
        assert_eq!(buttons.len(), 1);
        assert!(screen.is_empty());
    }

    #[test]
    fn full_screen_queue_drops_descriptor() {
        let (mut sys, mut buttons, mut screen) = system();
        while screen.push(ScreenDescriptor::placeholder()) {}
        buttons.push(ButtonSignal::down(ButtonId::Down));
        sys.step(&mut buttons, &mut screen);

        assert_eq!(screen.len(), screen.capacity());
        assert_eq!(sys.menu().current_index(), 1);
    }

    #[test]
    fn status_stays_idle_during_navigation() {
        let (mut sys, mut buttons, mut screen) = system();
        buttons.push(ButtonSignal::down(ButtonId::Select));
        sys.step(&mut buttons, &mut screen);
        sys.step(&mut buttons, &mut screen);
        assert_eq!(sys.status(), SystemStatus::Idle);
    }

    #[test]
    fn status_transitions() {
        let idle = SystemStatus::Idle;
        assert_eq!(idle.on_request(None), SystemStatus::Idle);
        assert_eq!(idle.on_request(Some(StatusRequest::Idle)), SystemStatus::Idle);
        assert_eq!(idle.on_request(Some(StatusRequest::Active)), SystemStatus::Active);

        let active = SystemStatus::Active;
        assert_eq!(active.on_request(None), SystemStatus::Active);
        assert_eq!(active.on_request(Some(StatusRequest::Active)), SystemStatus::Active);
        assert_eq!(active.on_request(Some(StatusRequest::Idle)), SystemStatus::Idle);
    }

    fn long_menu(items: usize) -> System {
        let mut tree = MenuTree::new();
        for i in 1..=items {
            tree.add_item(MenuId::ROOT, &format!("Item {}", i)).unwrap();
        }
        System::with_menu(tree)
    }

    #[test]
    fn long_menu_scrolls_to_keep_selection_visible() {
        let mut sys = long_menu(6);
        let mut buttons = EventQueue::new();
        let mut screen = EventQueue::new();
        for _ in 0..5 {
            buttons.push(ButtonSignal::down(ButtonId::Down));
            sys.step(&mut buttons, &mut screen);
        }

        let sent: Vec<ScreenDescriptor> =
            core::iter::from_fn(|| screen.pop()).collect();
        assert_eq!(sent.len(), 5);
        assert!(sent.iter().all(|d| d.selected < LCD_ROWS));

        // Moves inside the first window only move the marker.
        assert_eq!(
            sent[..3].iter().map(|d| (d.selected, d.full_repaint)).collect::<Vec<_>>(),
            [(1, false), (2, false), (3, false)]
        );
        // Each scroll rewrites the rows.
        assert!(sent[3].full_repaint);
        assert_eq!(lines(&sent[3]), ["Item 2", "Item 3", "Item 4", "Item 5"]);

        let last = &sent[4];
        assert!(last.full_repaint);
        assert_eq!(last.selected, 3);
        assert_eq!(lines(last), ["Item 3", "Item 4", "Item 5", "Item 6"]);
        assert_eq!(sys.menu().current_index(), 5);
    }

    #[test]
    fn scrolling_back_up_follows_the_selection() {
        let mut sys = long_menu(6);
        let mut buttons = EventQueue::new();
        let mut screen = EventQueue::new();
        for id in [ButtonId::Down; 5].into_iter().chain([ButtonId::Up; 3]) {
            buttons.push(ButtonSignal::down(id));
            sys.step(&mut buttons, &mut screen);
        }

        let sent: Vec<ScreenDescriptor> = core::iter::from_fn(|| screen.pop()).collect();
        let ups = &sent[5..];

        // Index 4 and 3 pull the window back up, one row at a time.
        assert_eq!((ups[0].selected, ups[0].full_repaint), (3, true));
        assert_eq!(lines(&ups[0]), ["Item 2", "Item 3", "Item 4", "Item 5"]);
        assert_eq!((ups[1].selected, ups[1].full_repaint), (3, true));
        assert_eq!(lines(&ups[1]), ["Item 1", "Item 2", "Item 3", "Item 4"]);

        // Back inside the first window only the marker moves.
        assert_eq!((ups[2].selected, ups[2].full_repaint), (2, false));
        assert_eq!(sys.first_visible_row(), 0);
    }

    #[test]
    fn descriptor_for_custom_short_menu() {
        let mut tree = MenuTree::new();
        tree.add_item(MenuId::ROOT, "Only").unwrap();
        let sys = System::with_menu(tree);

        let d = sys.build_descriptor(false);
        assert_eq!(lines(&d), ["Only", "", "", ""]);
    }
}
