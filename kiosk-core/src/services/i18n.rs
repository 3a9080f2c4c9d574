//! Localization
//!
//! Message lookup with fallback: requested locale → default locale → the key
//! itself. A missing translation never fails.

use shared::error::{KioskError, KioskResult};
use shared::models::Locale;
use std::collections::HashMap;
use std::path::Path;

pub trait Translator: Send + Sync {
    fn translate(&self, locale: Locale, key: &str) -> String;
}

type Table = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct Translations {
    default_locale: Locale,
    tables: HashMap<Locale, Table>,
}

/// (key, en, fr, nl)
const BUILTIN: &[(&str, &str, &str, &str)] = &[
    ("welcome", "Welcome", "Bienvenue", "Welkom"),
    ("start_ordering", "Start ordering", "Commencer la commande", "Begin met bestellen"),
    ("select_order_type", "How would you like to eat?", "Comment souhaitez-vous manger ?", "Hoe wilt u eten?"),
    ("eat_in", "Eat in", "Sur place", "Hier opeten"),
    ("take_away", "Take away", "À emporter", "Meenemen"),
    ("food_title", "Food", "Plats", "Eten"),
    ("drinks_title", "Drinks", "Boissons", "Dranken"),
    ("review_order", "Review order", "Vérifier la commande", "Bestelling controleren"),
    ("payment_title", "Payment", "Paiement", "Betaling"),
    ("no_items_found", "No items found", "Aucun article trouvé", "Geen items gevonden"),
    ("add_to_cart", "Add to cart", "Ajouter au panier", "Toevoegen"),
    ("item_added", "Added to your order", "Ajouté à votre commande", "Toegevoegd aan uw bestelling"),
    ("item_updated", "Item updated", "Article mis à jour", "Item bijgewerkt"),
    ("item_removed", "Item removed", "Article supprimé", "Item verwijderd"),
    ("cart_empty", "Your cart is empty", "Votre panier est vide", "Uw winkelwagen is leeg"),
    (
        "cart_empty_warning",
        "Please add items to your cart first",
        "Veuillez d'abord ajouter des articles",
        "Voeg eerst items toe aan uw winkelwagen",
    ),
    (
        "customize_your_order",
        "Customize your order",
        "Personnalisez votre commande",
        "Pas uw bestelling aan",
    ),
    (
        "required_option_missing",
        "Please make a selection for every required option",
        "Veuillez choisir chaque option obligatoire",
        "Maak een keuze voor elke verplichte optie",
    ),
    ("subtotal", "Subtotal", "Sous-total", "Subtotaal"),
    ("tax", "Tax", "TVA", "BTW"),
    ("total", "Total", "Total", "Totaal"),
    ("processing", "Processing...", "Traitement...", "Verwerken..."),
    (
        "payment_processing",
        "A payment is already in progress",
        "Un paiement est déjà en cours",
        "Er is al een betaling bezig",
    ),
    ("payment_success", "Payment successful!", "Paiement réussi !", "Betaling geslaagd!"),
    ("payment_failed", "Payment failed", "Le paiement a échoué", "Betaling mislukt"),
    ("invalid_card_number", "Invalid card number", "Numéro de carte invalide", "Ongeldig kaartnummer"),
    (
        "card_name_required",
        "Cardholder name is required",
        "Le nom du titulaire est requis",
        "Naam kaarthouder is verplicht",
    ),
    ("invalid_expiry_date", "Invalid expiry date", "Date d'expiration invalide", "Ongeldige vervaldatum"),
    ("invalid_cvv", "Invalid CVV", "CVV invalide", "Ongeldige CVV"),
    ("idle_title", "Are you still there?", "Êtes-vous toujours là ?", "Bent u er nog?"),
    ("still_here", "I'm still here", "Je suis toujours là", "Ik ben er nog"),
    ("start_over", "Start over", "Recommencer", "Opnieuw beginnen"),
    (
        "session_reset",
        "Your session has been reset",
        "Votre session a été réinitialisée",
        "Uw sessie is opnieuw gestart",
    ),
    (
        "something_went_wrong",
        "Something went wrong",
        "Une erreur est survenue",
        "Er is iets misgegaan",
    ),
];

impl Translations {
    /// Empty table set; every lookup falls back to the key
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale,
            tables: HashMap::new(),
        }
    }

    /// Core kiosk messages in every supported locale
    pub fn builtin() -> Self {
        let mut t = Self::new(Locale::En);
        for (key, en, fr, nl) in BUILTIN {
            t.insert(Locale::En, key, en);
            t.insert(Locale::Fr, key, fr);
            t.insert(Locale::Nl, key, nl);
        }
        t
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn insert(&mut self, locale: Locale, key: &str, value: &str) {
        self.tables
            .entry(locale)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Overlay tables parsed from JSON: `{"en": {"key": "text"}, "fr": {...}}`
    ///
    /// Unknown locale codes are rejected.
    pub fn merge_json(&mut self, json: &str) -> KioskResult<()> {
        let raw: HashMap<String, Table> =
            serde_json::from_str(json).map_err(|e| KioskError::DataLoad(e.to_string()))?;
        for (code, table) in raw {
            let locale: Locale = code
                .parse()
                .map_err(|_| KioskError::DataLoad(format!("unknown locale: {code}")))?;
            self.tables.entry(locale).or_default().extend(table);
        }
        Ok(())
    }

    /// Built-in messages overlaid with the file at `path`
    pub fn load(path: impl AsRef<Path>) -> KioskResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| KioskError::DataLoad(format!("{}: {}", path.display(), e)))?;
        let mut t = Self::builtin();
        t.merge_json(&json)?;
        tracing::info!(path = %path.display(), "Translations loaded");
        Ok(t)
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        self.tables.get(&locale)?.get(key).map(String::as_str)
    }
}

impl Translator for Translations {
    fn translate(&self, locale: Locale, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(self.default_locale, key))
            .unwrap_or(key)
            .to_string()
    }
}
