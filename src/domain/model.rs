use serde::{Deserialize, Serialize};

pub const DEFAULT_MADE_IN: &str = "MADE IN CHINA";
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// The five rendered fields of a label, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelField {
    CustomerName,
    ProductInfo,
    ProductQuantity,
    MadeIn,
    CustomerInfo,
}

impl LabelField {
    pub const ALL: [LabelField; 5] = [
        LabelField::CustomerName,
        LabelField::ProductInfo,
        LabelField::ProductQuantity,
        LabelField::MadeIn,
        LabelField::CustomerInfo,
    ];

    /// Name of the form field carrying this field's font size.
    pub fn font_size_input(self) -> &'static str {
        match self {
            LabelField::CustomerName => "name_font_size",
            LabelField::ProductInfo => "product_info_font_size",
            LabelField::ProductQuantity => "product_quantity_font_size",
            LabelField::MadeIn => "made_in_font_size",
            LabelField::CustomerInfo => "customer_info_font_size",
        }
    }
}

/// Font size in points for each label field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizes {
    pub name: u32,
    pub product_info: u32,
    pub product_quantity: u32,
    pub made_in: u32,
    pub customer_info: u32,
}

impl FontSizes {
    pub fn uniform(size: u32) -> Self {
        Self {
            name: size,
            product_info: size,
            product_quantity: size,
            made_in: size,
            customer_info: size,
        }
    }

    pub fn get(&self, field: LabelField) -> u32 {
        match field {
            LabelField::CustomerName => self.name,
            LabelField::ProductInfo => self.product_info,
            LabelField::ProductQuantity => self.product_quantity,
            LabelField::MadeIn => self.made_in,
            LabelField::CustomerInfo => self.customer_info,
        }
    }

    pub fn set(&mut self, field: LabelField, size: u32) {
        match field {
            LabelField::CustomerName => self.name = size,
            LabelField::ProductInfo => self.product_info = size,
            LabelField::ProductQuantity => self.product_quantity = size,
            LabelField::MadeIn => self.made_in = size,
            LabelField::CustomerInfo => self.customer_info = size,
        }
    }
}

impl Default for FontSizes {
    fn default() -> Self {
        Self::uniform(DEFAULT_FONT_SIZE)
    }
}

/// Shared metadata of one submission, applied to every row in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    pub customer_name: String,
    pub customer_info: String,
    pub made_in: String,
    pub font_sizes: FontSizes,
}

/// One data row as read from the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based row number in the sheet, header included.
    pub row: usize,
    pub factory_name: String,
    pub product_info: String,
    pub product_quantity: String,
}

/// A product row with the order's shared fields copied onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductLabel {
    pub customer_name: String,
    pub product_info: String,
    pub product_quantity: String,
    pub made_in: String,
    pub customer_info: String,
}

impl ProductLabel {
    pub fn text(&self, field: LabelField) -> String {
        match field {
            LabelField::CustomerName => self.customer_name.clone(),
            LabelField::ProductInfo => format!("ITEM: {}", self.product_info),
            LabelField::ProductQuantity => format!("QTY: {}", self.product_quantity),
            LabelField::MadeIn => self.made_in.clone(),
            LabelField::CustomerInfo => self.customer_info.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryGroup {
    pub factory_name: String,
    pub labels: Vec<ProductLabel>,
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub factory_name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub label_count: usize,
    pub page_breaks: usize,
}

#[derive(Debug, Clone)]
pub struct RenderResult {
    pub order_number: String,
    pub documents: Vec<RenderedDocument>,
}

impl RenderResult {
    pub fn label_count(&self) -> usize {
        self.documents.iter().map(|d| d.label_count).sum()
    }
}
