use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    /// Name under which the template is registered. Names ending in `.html`
    /// are rendered with html escaping enabled.
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: (&str, &str) = ("base.html", include_str!("../templates/base.html"));

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactNotificationTemplate("contact_notification.html"),
    ContactNotificationTextTemplate("contact_notification.txt"),
}

/// Html body of the notification sent to the operator for every contact
/// form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub received_at: String,
    /// `mailto:` link with a prefilled reply subject and greeting.
    pub reply_url: String,
    pub whatsapp_url: Option<String>,
    pub site_name: String,
    pub site_url: Option<String>,
}

/// Plain text fallback of [`ContactNotificationTemplate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactNotificationTextTemplate {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub received_at: String,
    pub site_name: String,
}
