use courier_core_contact_impl::ContactFeatureServiceImpl;
use courier_core_health_impl::HealthFeatureServiceImpl;
use courier_email_impl::EmailServiceImpl;
use courier_shared_impl::time::TimeServiceImpl;
use courier_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = courier_api_rest::RestServer<HealthFeature, ContactFeature>;

// Email
pub type Email = EmailServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Time, Email, Template>;
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
