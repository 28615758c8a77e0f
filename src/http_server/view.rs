//! # List Page View
//!
//! Template environment and the context the page template renders from.

use minijinja::Environment;
use serde::Serialize;

use crate::record::Record;
use crate::schema::{Field, Schema};
use crate::validation::{FieldErrors, FormValues};

const PAGE_TEMPLATE: &str = "crud.html";

/// Embedded templates
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("templates/crud.html"))?;
        Ok(Self { env })
    }

    pub fn render_page(&self, page: &PageView) -> Result<String, minijinja::Error> {
        self.env.get_template(PAGE_TEMPLATE)?.render(page)
    }
}

/// Pagination links for the list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: u64,
    pub total_records: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: usize,
    pub next_page: usize,
}

impl Pagination {
    pub fn new(current_page: usize, total_pages: u64, total_records: u64) -> Self {
        Self {
            current_page,
            total_pages,
            total_records,
            has_prev: current_page > 1,
            has_next: (current_page as u64) < total_pages,
            prev_page: current_page.saturating_sub(1),
            next_page: current_page.saturating_add(1),
        }
    }
}

/// One form input
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub input_type: &'static str,
    pub required: bool,
    /// Auto-increment keys are not typed in by the user
    pub hidden: bool,
    pub mask: String,
    pub validate_type: &'static str,
    pub value: String,
    pub error: Option<String>,
}

impl FieldView {
    fn new(field: &Field, form: Option<&FormValues>, errors: Option<&FieldErrors>) -> Self {
        let input_type = if field.has_mask() {
            "text"
        } else {
            field.field_type.input_type()
        };

        Self {
            name: field.name.clone(),
            input_type,
            required: field.required,
            hidden: field.is_auto_increment(),
            mask: field.mask.clone(),
            validate_type: field.validation.kind.name(),
            value: form.map(|f| f.get(&field.name).to_string()).unwrap_or_default(),
            error: errors.and_then(|e| e.get(&field.name)).map(str::to_string),
        }
    }
}

/// One table row, cells in schema order
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub id: String,
    pub cells: Vec<String>,
}

/// Everything the list page template reads
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub table_name: String,
    pub columns: Vec<String>,
    pub fields: Vec<FieldView>,
    pub rows: Vec<RowView>,
    pub form_error: Option<String>,
    /// Value of the hidden `id` input when re-rendering an edit
    pub edit_id: String,
    pub search: String,
    pub pagination: Pagination,
    pub colspan: usize,
    /// Cache-busting token for static assets
    pub current_time: i64,
}

impl PageView {
    pub fn new(schema: &Schema, records: &[Record], search: &str, pagination: Pagination) -> Self {
        let pk = schema.primary_key().map(|f| f.name.as_str());
        let rows = records
            .iter()
            .map(|record| RowView {
                id: pk.and_then(|k| cell(record, k)).unwrap_or_default(),
                cells: schema
                    .fields
                    .iter()
                    .map(|f| cell(record, &f.name).unwrap_or_default())
                    .collect(),
            })
            .collect();

        Self {
            table_name: schema.table_name.clone(),
            columns: schema.fields.iter().map(|f| f.name.clone()).collect(),
            fields: schema
                .fields
                .iter()
                .map(|f| FieldView::new(f, None, None))
                .collect(),
            rows,
            form_error: None,
            edit_id: String::new(),
            search: search.to_string(),
            pagination,
            colspan: schema.fields.len() + 1,
            current_time: chrono::Utc::now().timestamp(),
        }
    }

    /// Repopulates the form with a rejected submission and its errors
    pub fn with_submission(mut self, schema: &Schema, form: &FormValues, errors: &FieldErrors) -> Self {
        self.fields = schema
            .fields
            .iter()
            .map(|f| FieldView::new(f, Some(form), Some(errors)))
            .collect();
        self.form_error = errors.form_error().map(str::to_string);
        self.edit_id = form.get("id").to_string();
        self
    }
}

fn cell(record: &Record, column: &str) -> Option<String> {
    record.get(column).cloned().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, ValidationKind};

    fn schema() -> Schema {
        Schema::new(
            "clientes",
            vec![
                Field::new("id", FieldType::Int).primary_key(),
                Field::new("nome", FieldType::String).required(),
                Field::new("cpf", FieldType::String)
                    .with_validation(ValidationKind::Cpf)
                    .with_mask("999.999.999-99"),
                Field::new("idade", FieldType::Int),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_pagination_links() {
        let p = Pagination::new(1, 3, 25);
        assert!(!p.has_prev);
        assert!(p.has_next);
        assert_eq!(p.next_page, 2);

        let p = Pagination::new(3, 3, 25);
        assert!(p.has_prev);
        assert!(!p.has_next);
        assert_eq!(p.prev_page, 2);

        assert!(!Pagination::new(1, 0, 0).has_next);
    }

    #[test]
    fn test_field_views() {
        let view = PageView::new(&schema(), &[], "", Pagination::new(1, 0, 0));
        assert!(view.fields[0].hidden);
        assert_eq!(view.fields[2].input_type, "text");
        assert_eq!(view.fields[2].validate_type, "cpf");
        assert_eq!(view.fields[3].input_type, "number");
        assert_eq!(view.colspan, 5);
    }

    #[test]
    fn test_rows_follow_schema_order() {
        let record: Record = [
            ("idade".to_string(), None),
            ("nome".to_string(), Some("Ana".to_string())),
            ("id".to_string(), Some("7".to_string())),
            ("cpf".to_string(), Some("529.982.247-25".to_string())),
        ]
        .into_iter()
        .collect();

        let view = PageView::new(&schema(), &[record], "", Pagination::new(1, 1, 1));
        assert_eq!(view.rows[0].id, "7");
        assert_eq!(view.rows[0].cells, vec!["7", "Ana", "529.982.247-25", ""]);
    }

    #[test]
    fn test_submission_repopulates_form() {
        let schema = schema();
        let form = FormValues::from_pairs([("id", "3"), ("nome", ""), ("cpf", "123")]);
        let mut errors = FieldErrors::new();
        errors.insert("nome", "Campo obrigatório");
        errors.set_form_error("Erro interno ao atualizar.");

        let view = PageView::new(&schema, &[], "", Pagination::new(1, 0, 0))
            .with_submission(&schema, &form, &errors);
        assert_eq!(view.fields[1].error.as_deref(), Some("Campo obrigatório"));
        assert_eq!(view.fields[2].value, "123");
        assert_eq!(view.form_error.as_deref(), Some("Erro interno ao atualizar."));
        assert_eq!(view.edit_id, "3");
    }

    #[test]
    fn test_page_renders() {
        let templates = Templates::new().unwrap();
        let view = PageView::new(&schema(), &[], "ana", Pagination::new(1, 0, 0));
        let html = templates.render_page(&view).unwrap();
        assert!(html.contains("clientes"));
        assert!(html.contains("data-mask=\"999.999.999-99\""));
        assert!(html.contains("value=\"ana\""));
    }
}
