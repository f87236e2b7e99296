//! Hierarchical menu model and navigation cursor.
//!
//! Menus live in a fixed-capacity arena and refer to each other by
//! [`MenuId`]. Ownership runs downward only: a menu owns its items and an
//! item names its sub-menu by handle. The upward link (`parent`) is a
//! plain handle as well, so the tree has no self-referential pointers.
//!
//! Every menu remembers its own selection. Leaving a sub-menu and coming
//! back later finds both menus exactly where they were.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{
    DEFAULT_MENU_ITEMS, DEFAULT_SUBMENU_ITEMS, MAX_MENUS, MAX_MENU_ITEMS, MENU_LABEL_LEN,
};
use crate::error::{Error, Result};

/// Menu item label, truncated to the LCD-friendly maximum.
pub type Label = String<MENU_LABEL_LEN>;

/// Build a label from `text`, dropping characters that do not fit.
pub fn label(text: &str) -> Label {
    let mut l = Label::new();
    for c in text.chars() {
        if l.push(c).is_err() {
            break;
        }
    }
    l
}

/// Handle of a menu inside a [`MenuTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuId(u8);

impl MenuId {
    pub const ROOT: MenuId = MenuId(0);

    fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// One row of a menu: a leaf, or the entry point of a sub-menu.
#[derive(Clone, Debug)]
pub struct MenuItem {
    pub label: Label,
    pub child: Option<MenuId>,
}

/// A single level of the tree.
#[derive(Clone, Debug)]
pub struct Menu {
    items: Vec<MenuItem, MAX_MENU_ITEMS>,
    selected: usize,
    parent: Option<MenuId>,
}

impl Menu {
    const fn new(parent: Option<MenuId>) -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            parent,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Label at `index`, or `None` past the end.
    pub fn item_label(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.label.as_str())
    }

    pub fn current_index(&self) -> usize {
        self.selected
    }

    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    fn selected_child(&self) -> Option<MenuId> {
        self.items.get(self.selected).and_then(|item| item.child)
    }
}

/// Arena of menus plus the navigation cursor.
#[derive(Clone, Debug)]
pub struct MenuTree {
    menus: Vec<Menu, MAX_MENUS>,
    current: MenuId,
}

impl MenuTree {
    /// A tree holding only an empty root menu.
    pub fn new() -> Self {
        let mut menus = Vec::new();
        // Arena capacity is a non-zero constant.
        let _ = menus.push(Menu::new(None));
        Self {
            menus,
            current: MenuId::ROOT,
        }
    }

    /// The start-up layout: "Menu Item 1..4", each owning
    /// "Submenu i Item 1..3".
    pub fn with_default_layout() -> Self {
        let mut tree = Self::new();
        // The default layout fits the configured capacities.
        let _ = tree.build_default_layout();
        tree
    }

    fn build_default_layout(&mut self) -> Result<()> {
        for i in 1..=DEFAULT_MENU_ITEMS {
            let mut text = Label::new();
            let _ = write!(text, "Menu Item {}", i);
            let sub = self.add_submenu(MenuId::ROOT, &text)?;

            for j in 1..=DEFAULT_SUBMENU_ITEMS {
                let mut text = Label::new();
                let _ = write!(text, "Submenu {} Item {}", i, j);
                self.add_item(sub, &text)?;
            }
        }
        Ok(())
    }

    /// Append a leaf item to `menu`; returns its index.
    pub fn add_item(&mut self, menu: MenuId, text: &str) -> Result<usize> {
        self.push_item(menu, text, None)
    }

    /// Append an item to `parent` that owns a new, empty sub-menu.
    pub fn add_submenu(&mut self, parent: MenuId, text: &str) -> Result<MenuId> {
        if self.menu(parent).is_none() {
            return Err(Error::InvalidMenu);
        }
        if self.menus.is_full() || self.menus[parent.index()].items.is_full() {
            return Err(Error::MenuFull);
        }
        let id = MenuId(u8::try_from(self.menus.len()).map_err(|_| Error::MenuFull)?);
        self.menus
            .push(Menu::new(Some(parent)))
            .map_err(|_| Error::MenuFull)?;
        self.push_item(parent, text, Some(id))?;
        Ok(id)
    }

    fn push_item(&mut self, menu: MenuId, text: &str, child: Option<MenuId>) -> Result<usize> {
        let m = self
            .menus
            .get_mut(menu.index())
            .ok_or(Error::InvalidMenu)?;
        m.items
            .push(MenuItem {
                label: label(text),
                child,
            })
            .map_err(|_| Error::MenuFull)?;
        Ok(m.items.len() - 1)
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.menus.get(id.index())
    }

    /// Number of menus in the arena.
    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Handle of the menu under the cursor.
    pub fn current(&self) -> MenuId {
        self.current
    }

    pub fn current_menu(&self) -> &Menu {
        &self.menus[self.current.index()]
    }

    fn current_menu_mut(&mut self) -> &mut Menu {
        &mut self.menus[self.current.index()]
    }

    /// Select the previous item; stays on the first one.
    pub fn move_up(&mut self) {
        self.current_menu_mut().move_up();
    }

    /// Select the next item; stays on the last one.
    pub fn move_down(&mut self) {
        self.current_menu_mut().move_down();
    }

    /// Descend into the selected item's sub-menu, if it has one.
    pub fn select(&mut self) {
        if let Some(child) = self.current_menu().selected_child() {
            self.current = child;
        }
    }

    /// Ascend to the parent menu, if there is one.
    pub fn go_to_parent(&mut self) {
        if let Some(parent) = self.current_menu().parent() {
            self.current = parent;
        }
    }

    pub fn item_count(&self) -> usize {
        self.current_menu().item_count()
    }

    pub fn item_label(&self, index: usize) -> Option<&str> {
        self.current_menu().item_label(index)
    }

    pub fn current_index(&self) -> usize {
        self.current_menu().current_index()
    }
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::with_default_layout()
    }
}
