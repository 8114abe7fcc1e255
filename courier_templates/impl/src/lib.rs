use std::sync::Arc;

use courier_templates_contracts::{Template, TemplateService, BASE_TEMPLATE, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone, Default)]
pub struct TemplateServiceImpl {
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        let templates = std::iter::once(BASE_TEMPLATE).chain(TEMPLATES.iter().copied());
        tera.add_raw_templates(templates).unwrap();

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use courier_templates_contracts::{
        ContactNotificationTemplate, ContactNotificationTextTemplate,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn html_template() -> ContactNotificationTemplate {
        ContactNotificationTemplate {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: Some("Orçamento".into()),
            message: "Olá,\n  gostaria de um orçamento.".into(),
            received_at: "segunda-feira, 19 de outubro de 2026 às 11:30".into(),
            reply_url: "mailto:ana@example.com?subject=Re%3A%20Or%C3%A7amento".into(),
            whatsapp_url: None,
            site_name: "Portfolio".into(),
            site_url: Some("https://portfolio.example.com".into()),
        }
    }

    fn text_template() -> ContactNotificationTextTemplate {
        ContactNotificationTextTemplate {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            subject: None,
            message: "Olá,\n  gostaria de um orçamento.".into(),
            received_at: "19/10/2026 11:30".into(),
            site_name: "Portfolio".into(),
        }
    }

    #[test]
    fn contact_notification() {
        // Arrange
        let sut = TemplateServiceImpl::default();

        // Act
        let result = sut.render(&html_template()).unwrap();

        // Assert
        assert!(result.contains("<strong>Nome:</strong> Ana"));
        assert!(result.contains("segunda-feira, 19 de outubro de 2026 às 11:30"));
        assert!(result.contains("<strong>Assunto:</strong> Orçamento"));
        assert!(result.contains("Olá,\n  gostaria de um orçamento."));
        assert!(result.contains("white-space: pre-wrap"));
        assert!(!result.contains("WhatsApp"));
    }

    #[test]
    fn contact_notification_without_subject() {
        // Arrange
        let sut = TemplateServiceImpl::default();
        let template = ContactNotificationTemplate {
            subject: None,
            site_url: None,
            ..html_template()
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(!result.contains("Assunto:"));
        assert!(!result.contains("portfolio.example.com"));
    }

    #[test]
    fn contact_notification_with_whatsapp() {
        // Arrange
        let sut = TemplateServiceImpl::default();
        let template = ContactNotificationTemplate {
            whatsapp_url: Some("https://wa.me/5551999999999".into()),
            ..html_template()
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(result.contains("Responder por WhatsApp"));
    }

    #[test]
    fn contact_notification_escapes_user_input() {
        // Arrange
        let sut = TemplateServiceImpl::default();
        let template = ContactNotificationTemplate {
            name: "<script>alert(1)</script>".into(),
            message: "<b>oi</b> & tchau".into(),
            ..html_template()
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(!result.contains("<script>"));
        assert!(result.contains("&lt;script&gt;"));
        assert!(result.contains("&lt;b&gt;oi&lt;&#x2F;b&gt; &amp; tchau"));
    }

    #[test]
    fn contact_notification_text() {
        // Arrange
        let sut = TemplateServiceImpl::default();

        // Act
        let result = sut.render(&text_template()).unwrap();

        // Assert
        assert_eq!(
            result.trim_end(),
            "NOVA MENSAGEM DE CONTATO - Portfolio\n\nNome: Ana\nEmail: ana@example.com\nData: \
             19/10/2026 11:30\n\nMENSAGEM:\nOlá,\n  gostaria de um orçamento.\n\n---\nResponder \
             para: ana@example.com"
        );
    }

    #[test]
    fn contact_notification_text_is_not_escaped() {
        // Arrange
        let sut = TemplateServiceImpl::default();
        let template = ContactNotificationTextTemplate {
            subject: Some("Preço & prazo".into()),
            ..text_template()
        };

        // Act
        let result = sut.render(&template).unwrap();

        // Assert
        assert!(result.contains("Assunto: Preço & prazo\nData:"));
    }
}
