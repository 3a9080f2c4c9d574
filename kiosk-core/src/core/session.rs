//! Session - the single mutable state of one visitor
//!
//! Built at boot and rebuilt wholesale on reset. Every async result that
//! outlives a reset is recognized by its stale [`Session::epoch`].

use super::config::Config;
use crate::navigation::{NavPolicy, Navigator};
use crate::orders::Cart;
use serde::{Deserialize, Serialize};
use shared::models::{
    GridDensity, ItemKind, Locale, MenuFilter, OrderType, Step, Theme, ViewMode,
};

/// Display preferences chosen by the visitor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Preferences {
    pub locale: Locale,
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub grid_density: GridDensity,
}

/// Values a fresh session starts from
#[derive(Debug, Clone, Copy)]
struct SessionDefaults {
    intro_enabled: bool,
    nav_policy: NavPolicy,
    locale: Locale,
}

#[derive(Debug, Clone)]
pub struct Session {
    defaults: SessionDefaults,
    epoch: u64,
    navigator: Navigator,
    cart: Cart,
    preferences: Preferences,
    order_type: Option<OrderType>,
    food_filter: MenuFilter,
    drink_filter: MenuFilter,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let defaults = SessionDefaults {
            intro_enabled: config.intro_enabled(),
            nav_policy: config.nav_policy,
            locale: config.default_locale,
        };
        Self::fresh(defaults, 0)
    }

    fn fresh(defaults: SessionDefaults, epoch: u64) -> Self {
        Self {
            defaults,
            epoch,
            navigator: Navigator::new(defaults.intro_enabled, defaults.nav_policy),
            cart: Cart::new(),
            preferences: Preferences {
                locale: defaults.locale,
                ..Preferences::default()
            },
            order_type: None,
            food_filter: MenuFilter::new(ItemKind::Food),
            drink_filter: MenuFilter::new(ItemKind::Drink),
        }
    }

    /// Throw everything away and start over; bumps the epoch
    pub fn reset(&mut self) {
        *self = Self::fresh(self.defaults, self.epoch + 1);
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn current_step(&self) -> Step {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn locale(&self) -> Locale {
        self.preferences.locale
    }

    pub fn order_type(&self) -> Option<OrderType> {
        self.order_type
    }

    pub fn filter(&self, kind: ItemKind) -> &MenuFilter {
        match kind {
            ItemKind::Food => &self.food_filter,
            ItemKind::Drink => &self.drink_filter,
        }
    }

    pub fn filter_mut(&mut self, kind: ItemKind) -> &mut MenuFilter {
        match kind {
            ItemKind::Food => &mut self.food_filter,
            ItemKind::Drink => &mut self.drink_filter,
        }
    }

    // ========== Preferences ==========

    pub fn change_locale(&mut self, locale: Locale) {
        self.preferences.locale = locale;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.theme = self.preferences.theme.toggled();
        self.preferences.theme
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.preferences.view_mode = self.preferences.view_mode.toggled();
        self.preferences.view_mode
    }

    pub fn set_grid_density(&mut self, density: GridDensity) {
        self.preferences.grid_density = density;
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = Some(order_type);
    }
}
