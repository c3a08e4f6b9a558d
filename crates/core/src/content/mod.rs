//! Site content: entities, singleton documents and the schema normalizer.

pub mod entities;
pub mod normalize;
pub mod singleton;

pub use entities::{LegalPage, PricingPlan, Service, Testimonial};
pub use normalize::Row;
pub use singleton::{
    AboutContent, ContactContent, ContactDetails, DocumentError, FooterContent, HeroContent,
    SiteDocument,
};
