//! Server-side views (minijinja templates compiled into the binary).

use minijinja::{Environment, context};

use garage_core::{Record, ResourceDescriptor};

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    ("resource_list.html", include_str!("../../templates/resource_list.html")),
    ("resource_form.html", include_str!("../../templates/resource_form.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("register.html", include_str!("../../templates/register.html")),
];

/// Template renderer shared by all handlers.
#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// List view of any resource, newest records first as given.
    pub fn list(
        &self,
        resource: &ResourceDescriptor,
        records: &[Record],
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("resource_list.html")?.render(context! {
            resource => resource,
            counter => resource.counter_field().map(|f| f.name),
            records => records,
        })
    }

    /// Create form (`record` = `None`) or edit form prefilled from `record`.
    pub fn form(
        &self,
        resource: &ResourceDescriptor,
        record: Option<&Record>,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("resource_form.html")?.render(context! {
            resource => resource,
            record => record,
        })
    }

    pub fn login(&self, message: Option<&str>) -> Result<String, minijinja::Error> {
        self.env
            .get_template("login.html")?
            .render(context! { message => message })
    }

    pub fn register(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("register.html")?.render(context! {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garage_blog::POSTS;
    use garage_core::{Fields, RecordId};
    use garage_inventory::CARS;

    fn corolla(id: i64, count: i64) -> Record {
        Record {
            id: RecordId::new(id),
            fields: Fields::new()
                .text("brand", "Toyota")
                .text("model", "Corolla")
                .integer("year", 2022)
                .integer("available_count", count),
        }
    }

    #[test]
    fn list_shows_sell_link_only_while_in_stock() {
        let views = Views::new().unwrap();
        let html = views.list(&CARS, &[corolla(2, 0), corolla(1, 3)]).unwrap();

        assert!(html.contains("<h1>Cars</h1>"));
        assert!(html.contains("Corolla"));
        assert!(html.contains("/carros/vender/1"));
        assert!(!html.contains("/carros/vender/2"));
        assert!(html.contains("Sold out"));
        assert!(html.contains("/carros/editar/2"));
    }

    #[test]
    fn posts_list_has_no_sell_column() {
        let views = Views::new().unwrap();
        let post = Record {
            id: RecordId::new(1),
            fields: Fields::new()
                .text("title", "Hello")
                .text("author", "Ana")
                .text("body", "<script>alert(1)</script>"),
        };
        let html = views.list(&POSTS, &[post]).unwrap();

        assert!(!html.contains("vender"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let views = Views::new().unwrap();
        let html = views.list(&CARS, &[]).unwrap();
        assert!(html.contains("Nothing here yet."));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let views = Views::new().unwrap();
        let record = corolla(5, 3);
        let html = views.form(&CARS, Some(&record)).unwrap();

        assert!(html.contains(r#"action="/carros/editar/5""#));
        assert!(html.contains(r#"value="Corolla""#));
        assert!(html.contains(r#"name="available_count" value="3" min="0""#));
    }

    #[test]
    fn create_form_posts_to_novo() {
        let views = Views::new().unwrap();
        let html = views.form(&CARS, None).unwrap();
        assert!(html.contains(r#"action="/carros/novo""#));
        assert!(html.contains(r#"type="number" name="year""#));
    }

    #[test]
    fn login_message_is_optional() {
        let views = Views::new().unwrap();
        assert!(!views.login(None).unwrap().contains("class=\"message\""));
        assert!(views.login(Some("bad password")).unwrap().contains("bad password"));
        assert!(views.register().unwrap().contains(r#"action="/cadastro""#));
    }
}
