use crate::adapters::docx::DocumentWriter;
use crate::domain::model::{FactoryGroup, FontSizes, LabelField, RenderedDocument};
use crate::utils::error::Result;
use crate::utils::sanitize::sanitize_component;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Renders one document per factory group.
pub struct LabelRenderer {
    font_sizes: FontSizes,
    created: DateTime<Utc>,
}

impl LabelRenderer {
    pub fn new(font_sizes: FontSizes) -> Self {
        Self {
            font_sizes,
            created: Utc::now(),
        }
    }

    /// Five paragraphs per product, with a page break between products.
    pub fn render_group(&self, group: &FactoryGroup, file_name: String) -> Result<RenderedDocument> {
        let mut writer = DocumentWriter::new()?;

        for (i, label) in group.labels.iter().enumerate() {
            for field in LabelField::ALL {
                writer.paragraph(&label.text(field), self.font_sizes.get(field))?;
            }
            if i + 1 < group.labels.len() {
                writer.page_break()?;
            }
        }

        let page_breaks = writer.page_breaks();
        let bytes = writer.finish(&group.factory_name, self.created)?;

        Ok(RenderedDocument {
            factory_name: group.factory_name.clone(),
            file_name,
            bytes,
            label_count: group.labels.len(),
            page_breaks,
        })
    }

    pub fn render_all(&self, groups: &[FactoryGroup]) -> Result<Vec<RenderedDocument>> {
        let mut names = DocumentNames::default();
        groups
            .iter()
            .map(|group| {
                let file_name = names.assign(&group.factory_name);
                tracing::debug!(
                    "Rendering {} label(s) for factory '{}' into {}",
                    group.labels.len(),
                    group.factory_name,
                    file_name
                );
                self.render_group(group, file_name)
            })
            .collect()
    }
}

/// Hands out unique `.docx` file names for factories whose sanitised names
/// collide.
#[derive(Default)]
struct DocumentNames {
    taken: HashSet<String>,
}

impl DocumentNames {
    fn assign(&mut self, factory_name: &str) -> String {
        let stem = sanitize_component(factory_name);
        let mut candidate = format!("{}.docx", stem);
        let mut n = 2;
        while !self.taken.insert(candidate.to_lowercase()) {
            candidate = format!("{} ({}).docx", stem, n);
            n += 1;
        }
        candidate
    }
}
