//! Quotation email generation

pub mod email;

pub use email::EmailGenerator;

/// Footer appended to every outgoing email
pub const DEFAULT_SIGNATURE: &str = "Regards,
Hamada Tool
Procurement Manager
Arab Engineering & Distribution Company
Building B2 Mivida Business Park 90 St. 5th Settlement \u{2022} Cairo, Egypt
+20100 0266 344 | +202 2322 8800
hamada@aedco.com.eg
www.aedco.com";
