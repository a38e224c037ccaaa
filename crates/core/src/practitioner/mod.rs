//! Practitioners and their appointments.

pub mod service;
pub mod types;

pub use service::{MAX_PRACTITIONERS, PractitionerService, PractitionerStore};
pub use types::{
    APPOINTMENT_KIND, Address, AddressFields, AppointPractitioner, Appointment,
    AppointmentLinks, CreatePractitioner, MadeBy, NewPractitionerRecord, PRACTITIONER_KIND,
    Practitioner, PractitionerLinks, PractitionerRole,
};
