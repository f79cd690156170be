mod common;

use common::{page_breaks, spreadsheet, spreadsheet_with_headers, text_paragraphs, zip_entries};
use factory_labels::core::Storage;
use factory_labels::utils::error::LabelError;
use factory_labels::{LabelEngine, LabelPipeline, LocalStorage, OrderForm, TomlConfig};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    storage: LocalStorage,
    config: TomlConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = TomlConfig::default();
        config.storage.output_root = dir.path().display().to_string();
        Self {
            storage: LocalStorage::new(dir.path()),
            _dir: dir,
            config,
        }
    }

    /// Runs one order end to end and returns the archive entries.
    async fn run(
        &self,
        form: &[(&str, &str)],
        workbook: Vec<u8>,
    ) -> factory_labels::Result<Vec<(String, Vec<u8>)>> {
        let order = OrderForm::from_fields(form.iter().copied()).validate(&self.config.labels)?;
        let upload_path = format!("uploads/{}.xlsx", order.order_number);
        self.storage.write_file(&upload_path, &workbook).await?;

        let pipeline = LabelPipeline::new(
            self.storage.clone(),
            self.config.clone(),
            order,
            upload_path,
        );
        let archive_path = LabelEngine::new(pipeline).run().await?;
        let archive = self.storage.read_file(&archive_path).await?;
        Ok(zip_entries(&archive))
    }
}

fn form<'a>(order_number: &'a str, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut fields = vec![
        ("order_number", order_number),
        ("customer_name", "ACME Imports"),
        ("customer_info", "Dock 4, Rotterdam"),
    ];
    fields.extend_from_slice(extra);
    fields
}

#[tokio::test]
async fn test_one_document_per_factory_with_breaks_between_products() {
    let fixture = Fixture::new();
    let workbook = spreadsheet(&[
        ("Ningbo Plastics", "Bucket 10L", "120"),
        ("Ningbo Plastics", "Bucket 20L", "80"),
        ("Ningbo Plastics", "Lid", "200"),
        ("Yiwu Textiles", "Tote bag", "500"),
        ("Shenzhen Tools", "Hammer", "40"),
        ("Shenzhen Tools", "Wrench", "60"),
    ]);

    let entries = fixture.run(&form("PO-1001", &[]), workbook).await.unwrap();
    let names: Vec<_> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Ningbo Plastics.docx", "Yiwu Textiles.docx", "Shenzhen Tools.docx"]
    );

    let expected = [(3, 2), (1, 0), (2, 1)];
    for ((_, docx), (products, breaks)) in entries.iter().zip(expected) {
        assert_eq!(text_paragraphs(docx).len(), products * 5);
        assert_eq!(page_breaks(docx), breaks);
    }
}

#[tokio::test]
async fn test_label_paragraph_order_and_defaults() {
    let fixture = Fixture::new();
    let workbook = spreadsheet(&[("Ningbo Plastics", "Bucket 10L", "120")]);

    let entries = fixture.run(&form("PO-1002", &[]), workbook).await.unwrap();
    assert_eq!(entries.len(), 1);

    let paragraphs = text_paragraphs(&entries[0].1);
    let texts: Vec<_> = paragraphs.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "ACME Imports",
            "ITEM: Bucket 10L",
            "QTY: 120",
            "MADE IN CHINA",
            "Dock 4, Rotterdam",
        ]
    );
    assert!(paragraphs.iter().all(|p| p.size == Some(12)));
    assert_eq!(page_breaks(&entries[0].1), 0);
}

#[tokio::test]
async fn test_made_in_override_is_kept_verbatim() {
    let fixture = Fixture::new();
    let workbook = spreadsheet(&[("Hanoi Works", "Chair", "4")]);

    let entries = fixture
        .run(&form("PO-1003", &[("made_in", "Made in Vietnam ")]), workbook)
        .await
        .unwrap();

    let paragraphs = text_paragraphs(&entries[0].1);
    assert_eq!(paragraphs[3].text, "Made in Vietnam ");
}

#[tokio::test]
async fn test_font_sizes_apply_per_field() {
    let fixture = Fixture::new();
    let workbook = spreadsheet(&[("Ningbo Plastics", "Bucket", "1"), ("Ningbo Plastics", "Lid", "2")]);

    let entries = fixture
        .run(
            &form(
                "PO-1004",
                &[
                    ("name_font_size", "28"),
                    ("product_quantity_font_size", "20"),
                    ("customer_info_font_size", ""),
                ],
            ),
            workbook,
        )
        .await
        .unwrap();

    let sizes: Vec<_> = text_paragraphs(&entries[0].1)
        .iter()
        .map(|p| p.size)
        .collect();
    let label = [Some(28), Some(12), Some(20), Some(12), Some(12)];
    assert_eq!(sizes[..5], label);
    assert_eq!(sizes[5..], label);
}

#[tokio::test]
async fn test_sequential_orders_do_not_share_output() {
    let fixture = Fixture::new();

    let first = fixture
        .run(
            &form("PO-2001", &[]),
            spreadsheet(&[("North Mill", "Yarn", "10"), ("South Mill", "Cloth", "5")]),
        )
        .await
        .unwrap();
    let second = fixture
        .run(&form("PO-2002", &[]), spreadsheet(&[("East Mill", "Thread", "3")]))
        .await
        .unwrap();

    assert_eq!(first.len(), 2);
    let names: Vec<_> = second.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["East Mill.docx"]);
}

#[tokio::test]
async fn test_blank_rows_are_skipped_and_numbers_print_as_integers() {
    let fixture = Fixture::new();
    let workbook = spreadsheet(&[
        ("Ningbo Plastics", "Bucket", "120"),
        ("", "", ""),
        ("Ningbo Plastics", "Lid", "2.5"),
    ]);

    let entries = fixture.run(&form("PO-3001", &[]), workbook).await.unwrap();
    let paragraphs = text_paragraphs(&entries[0].1);
    assert_eq!(paragraphs.len(), 10);
    assert_eq!(paragraphs[2].text, "QTY: 120");
    assert_eq!(paragraphs[7].text, "QTY: 2.5");
}

#[tokio::test]
async fn test_missing_columns_are_reported_together() {
    let fixture = Fixture::new();
    let workbook = spreadsheet_with_headers(&["工厂名", "名称", "数量"], &[("A", "b", "1")]);

    let result = fixture.run(&form("PO-4001", &[]), workbook).await;
    match result {
        Err(LabelError::MissingColumns { missing }) => {
            assert_eq!(missing, vec!["产品信息".to_string(), "产品数量".to_string()]);
        }
        other => panic!("expected missing columns, got {:?}", other.map(|e| e.len())),
    }
    assert!(fixture.storage.read_file("PO-4001.zip").await.is_err());
}

#[tokio::test]
async fn test_header_only_sheet_is_rejected() {
    let fixture = Fixture::new();
    let result = fixture.run(&form("PO-4002", &[]), spreadsheet(&[])).await;
    assert!(matches!(result, Err(LabelError::NoProductRows)));
}

#[tokio::test]
async fn test_row_without_factory_is_rejected() {
    let fixture = Fixture::new();
    let workbook = spreadsheet(&[("North Mill", "Yarn", "10"), ("", "Cloth", "5")]);

    let result = fixture.run(&form("PO-4003", &[]), workbook).await;
    assert!(matches!(result, Err(LabelError::MissingFactory { row: 3 })));
}
