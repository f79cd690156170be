use crate::domain::model::{FactoryGroup, Order, ProductLabel, SheetRow};
use std::collections::HashMap;

/// Groups product rows by factory for a single order.
///
/// Factories keep the order in which they first appear; rows keep sheet
/// order within their factory. A factory name that shows up again later in
/// the sheet is merged into its existing group.
#[derive(Debug)]
pub struct LabelAggregator {
    customer_name: String,
    made_in: String,
    customer_info: String,
    groups: Vec<FactoryGroup>,
    index: HashMap<String, usize>,
}

impl LabelAggregator {
    pub fn new(order: &Order) -> Self {
        Self {
            customer_name: order.customer_name.clone(),
            made_in: order.made_in.clone(),
            customer_info: order.customer_info.clone(),
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add_product(
        &mut self,
        factory_name: &str,
        product_info: impl Into<String>,
        product_quantity: impl Into<String>,
    ) {
        let label = ProductLabel {
            customer_name: self.customer_name.clone(),
            product_info: product_info.into(),
            product_quantity: product_quantity.into(),
            made_in: self.made_in.clone(),
            customer_info: self.customer_info.clone(),
        };

        match self.index.get(factory_name) {
            Some(&position) => self.groups[position].labels.push(label),
            None => {
                self.index.insert(factory_name.to_string(), self.groups.len());
                self.groups.push(FactoryGroup {
                    factory_name: factory_name.to_string(),
                    labels: vec![label],
                });
            }
        }
    }

    pub fn add_rows(&mut self, rows: impl IntoIterator<Item = SheetRow>) {
        for row in rows {
            self.add_product(&row.factory_name, row.product_info, row.product_quantity);
        }
    }

    pub fn groups(&self) -> &[FactoryGroup] {
        &self.groups
    }

    pub fn label_count(&self) -> usize {
        self.groups.iter().map(|g| g.labels.len()).sum()
    }

    pub fn into_groups(self) -> Vec<FactoryGroup> {
        self.groups
    }
}
