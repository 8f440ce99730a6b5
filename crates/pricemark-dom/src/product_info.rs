use crate::delivery::{delivery_date, format_date_french, parse_delivery_days};
use crate::dom::{Document, NodeId};
use crate::guard::{DEFAULT_MAX_ROUNDS, GuardReport, PriceGuard};
use crate::slot::{SlotRole, WatchedSlot};
use crate::subscription::{
    BASE_PRICE_ATTR, SubscriptionChanged, init_options, select_option, update_cart_price,
};
use crate::Result;
use pricemark_core::{CurrencyTable, Marker, PriceConfig, normalize_with};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ActivateOptions {
    pub config: PriceConfig,
    /// Overrides "today" for the delivery estimate. `None` uses the local date.
    pub today: Option<chrono::NaiveDate>,
}

impl ActivateOptions {
    pub fn with_config(mut self, config: PriceConfig) -> Self {
        self.config = config;
        self
    }

    /// Pins the date the delivery estimate counts from, mainly for deterministic tests.
    pub fn with_fixed_today(mut self, today: Option<chrono::NaiveDate>) -> Self {
        self.today = today;
        self
    }
}

/// One product surface: its three price slots, the guard keeping them canonical, and the
/// subscription options that drive the cart price.
pub struct ProductInfo {
    root: NodeId,
    table: Arc<CurrencyTable>,
    slots: Vec<(SlotRole, NodeId)>,
    subscription_options: Vec<NodeId>,
    guard: PriceGuard<Document>,
}

impl ProductInfo {
    /// Activates the component rooted at `root`.
    ///
    /// Slots present at this point are normalized once directly, then put under guard; the guard
    /// only reacts to later mutations. Missing slots are skipped.
    pub fn activate(doc: &mut Document, root: NodeId, options: &ActivateOptions) -> Result<Self> {
        let config = &options.config;
        let table = Arc::new(config.currency_table()?);

        let mut resolved = Vec::new();
        for role in SlotRole::ALL {
            let marker = config.marker(role.config_key())?;
            if let Some(element) = doc.query(root, &marker) {
                resolved.push((role, element, marker));
            }
        }

        let option_marker = config.marker("subscription.option")?;
        let subscription_options = doc.query_all(root, &option_marker);
        init_options(doc, &subscription_options);

        format_prices(doc, &table, &resolved);

        let mut guard = PriceGuard::new(Arc::clone(&table));
        let slots = resolved.iter().map(|(role, el, _)| (*role, *el)).collect();
        for (role, element, marker) in resolved {
            guard.observe(doc, WatchedSlot::new(role, element, marker));
        }

        let today = options
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        init_delivery_date(doc, root, config, today)?;

        Ok(Self {
            root,
            table,
            slots,
            subscription_options,
            guard,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn table(&self) -> &CurrencyTable {
        &self.table
    }

    pub fn slot(&self, role: SlotRole) -> Option<NodeId> {
        self.slots
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, el)| *el)
    }

    pub fn guard(&self) -> &PriceGuard<Document> {
        &self.guard
    }

    pub fn subscription_options(&self) -> &[NodeId] {
        &self.subscription_options
    }

    /// Selects the subscription option at `index` and re-renders the cart price from its base.
    ///
    /// Returns `None` when there is no such option.
    pub fn select_subscription(
        &mut self,
        doc: &mut Document,
        index: usize,
    ) -> Option<SubscriptionChanged> {
        let chosen = select_option(doc, &self.subscription_options, index)?;
        let subscription_type = doc.attribute(chosen, "data-subscription").map(str::to_string);
        if let Some(cart) = self.slot(SlotRole::Cart) {
            update_cart_price(doc, &self.table, cart);
        }
        tracing::debug!(?subscription_type, "subscription changed");
        Some(SubscriptionChanged { subscription_type })
    }

    /// Delivers pending mutation records to the guard (one batch per slot).
    pub fn flush(&mut self, doc: &mut Document) -> GuardReport {
        self.guard.flush(doc)
    }

    /// Delivers records until the slots stop changing.
    pub fn settle(&mut self, doc: &mut Document) -> GuardReport {
        self.guard.settle(doc, DEFAULT_MAX_ROUNDS)
    }
}

fn format_prices(doc: &mut Document, table: &CurrencyTable, slots: &[(SlotRole, NodeId, Marker)]) {
    for &(role, element, _) in slots {
        let current = doc.text_content(element);
        let canonical = normalize_with(table, &current, role.keeps_decimals());
        if canonical != current {
            let canonical = canonical.into_owned();
            doc.set_text_content(element, &canonical);
        }

        if role == SlotRole::Cart {
            if let Some(base) = doc.attribute(element, BASE_PRICE_ATTR).map(str::to_string) {
                if !base.is_empty() {
                    let canonical = normalize_with(table, &base, false).into_owned();
                    doc.set_attribute(element, BASE_PRICE_ATTR, &canonical);
                }
            }
        }
    }
}

fn init_delivery_date(
    doc: &mut Document,
    root: NodeId,
    config: &PriceConfig,
    today: chrono::NaiveDate,
) -> Result<()> {
    let container_marker = config.marker("delivery.container")?;
    let target_marker = config.marker("delivery.target")?;
    let container_class = config.get_str("delivery.containerClass");

    let Some(container) = doc
        .query_all(root, &container_marker)
        .into_iter()
        .find(|el| container_class.is_none_or(|class| doc.has_class(*el, class)))
    else {
        return Ok(());
    };

    let days = parse_delivery_days(doc.attribute(container, "data-delivery-days"));
    let Some(target) = doc.query(container, &target_marker) else {
        return Ok(());
    };
    if days == 0 {
        return Ok(());
    }

    if let Some(date) = delivery_date(today, days) {
        doc.set_text_content(target, &format!(" {}", format_date_french(date)));
    }
    Ok(())
}
