use crate::models::Contact;

pub const VCARD_CONTENT_TYPE: &str = "text/vcard";
pub const VCARD_FILENAME: &str = "contacts.vcf";

/// Render contacts as concatenated vCard 3.0 entries with CRLF line endings.
///
/// Input is expected to be sanitised already; no escaping is applied.
pub fn render_vcards(contacts: &[Contact]) -> String {
    contacts
        .iter()
        .map(|contact| {
            format!(
                "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:{}\r\nTEL:{}\r\nEND:VCARD\r\n",
                contact.name, contact.phone
            )
        })
        .collect()
}

/// `Content-Disposition` value for the export download.
pub fn attachment_disposition() -> String {
    format!("attachment; filename=\"{}\"", VCARD_FILENAME)
}
