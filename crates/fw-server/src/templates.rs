//! HTML templates.
//!
//! Templates are embedded at compile time and rendered with minijinja.
//! Auto-escaping is on for every template; only the page body on the view
//! page is marked safe, since bodies are trusted HTML fragments carrying the
//! generated links.

use fw_wiki::{Page, Title};
use minijinja::{Environment, Value, context};

/// Template registry.
pub(crate) struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Build the registry from the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to parse.
    pub(crate) fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../templates/base.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template("view.html", include_str!("../templates/view.html"))?;
        env.add_template("edit.html", include_str!("../templates/edit.html"))?;
        Ok(Self { env })
    }

    /// Landing page listing known titles.
    pub(crate) fn render_index(&self, titles: &[Title]) -> Result<String, minijinja::Error> {
        let titles: Vec<&str> = titles.iter().map(Title::as_str).collect();
        self.env
            .get_template("index.html")?
            .render(context! { titles => titles })
    }

    /// Page view with the body embedded unescaped.
    pub(crate) fn render_view(&self, page: &Page) -> Result<String, minijinja::Error> {
        self.env.get_template("view.html")?.render(context! {
            title => page.title().as_str(),
            body => Value::from_safe_string(page.body_text().into_owned()),
        })
    }

    /// Edit form; the body is escaped inside the textarea.
    pub(crate) fn render_edit(&self, page: &Page) -> Result<String, minijinja::Error> {
        self.env.get_template("edit.html")?.render(context! {
            title => page.title().as_str(),
            body => page.body_text().as_ref(),
        })
    }
}
