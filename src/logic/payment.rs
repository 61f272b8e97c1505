//! Simulated PIX charges: BR Code ("copia e cola") payloads and their rendered codes.
//!
//! No money moves. A charge is a payload string for the registration's entry fee
//! plus an image of it that a banking app can scan.

use crate::models::{PixDetails, RegistrationId, TournamentError};
use crate::store::Stores;
use base64::{engine::general_purpose, Engine as _};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

const GUI_PIX: &str = "BR.GOV.BCB.PIX";
const MAX_NAME_LEN: usize = 25;
const MAX_CITY_LEN: usize = 15;
const MAX_TXID_LEN: usize = 25;
const MAX_FIELD_LEN: usize = 99;
const MAX_AMOUNT_LEN: usize = 13;
/// Longest key that keeps the merchant account field (GUI + key) within 99 characters.
pub const MAX_PIX_KEY_LEN: usize = MAX_FIELD_LEN - 4 - GUI_PIX.len() - 4;

/// Who receives the PIX payments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixSettings {
    pub key: String,
    pub receiver_name: String,
    pub receiver_city: String,
}

/// Turns a payload string into a scannable image.
pub trait CodeRenderer: Send + Sync {
    fn render(&self, payload: &str) -> Result<Vec<u8>, TournamentError>;
}

/// Renders QR codes as SVG documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgQrRenderer;

impl CodeRenderer for SvgQrRenderer {
    fn render(&self, payload: &str) -> Result<Vec<u8>, TournamentError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::L)
            .map_err(|e| TournamentError::Render(e.to_string()))?;
        let image = code
            .render::<svg::Color<'_>>()
            .min_dimensions(200, 200)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();
        Ok(image.into_bytes())
    }
}

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF), as required by the BR Code.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// One EMV field: id, two-digit length, value.
fn field(id: &str, value: &str) -> Result<String, TournamentError> {
    if value.len() > MAX_FIELD_LEN {
        return Err(TournamentError::Validation(format!(
            "BR Code field {id} is longer than {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(format!("{id}{:02}{value}", value.len()))
}

/// Printable ASCII only, cut to `max` characters.
fn sanitize(text: &str, max: usize) -> String {
    text.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .take(max)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build a static BR Code payload for `amount` (in BRL) payable to `key`.
///
/// Fails with `Validation` when the amount is negative or a field does not fit
/// the two-digit length prefix (a very long key, or an amount past 13 characters).
pub fn br_code_payload(
    key: &str,
    name: &str,
    city: &str,
    amount: f64,
    txid: &str,
) -> Result<String, TournamentError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(TournamentError::Validation(format!("Invalid PIX amount {amount}")));
    }
    let amount = format!("{amount:.2}");
    if amount.len() > MAX_AMOUNT_LEN {
        return Err(TournamentError::Validation(format!(
            "PIX amount {amount} is longer than {MAX_AMOUNT_LEN} characters"
        )));
    }
    let account = field("00", GUI_PIX)? + &field("01", key)?;
    let txid = match sanitize(txid, MAX_TXID_LEN) {
        t if t.is_empty() => "***".to_string(),
        t => t,
    };
    let mut payload = String::new();
    payload += &field("00", "01")?;
    payload += &field("26", &account)?;
    payload += &field("52", "0000")?;
    payload += &field("53", "986")?;
    payload += &field("54", &amount)?;
    payload += &field("58", "BR")?;
    payload += &field("59", &sanitize(name, MAX_NAME_LEN))?;
    payload += &field("60", &sanitize(city, MAX_CITY_LEN))?;
    payload += &field("62", &field("05", &txid)?)?;
    payload += "6304";
    let crc = crc16(payload.as_bytes());
    Ok(payload + &format!("{crc:04X}"))
}

/// Issues simulated PIX charges for registrations.
pub struct PaymentSimulator {
    settings: PixSettings,
    renderer: Box<dyn CodeRenderer>,
}

impl PaymentSimulator {
    pub fn new(settings: PixSettings, renderer: Box<dyn CodeRenderer>) -> Self {
        Self { settings, renderer }
    }

    pub fn settings(&self) -> &PixSettings {
        &self.settings
    }

    /// Create a charge for the registration's entry fee and attach it to the registration.
    pub fn generate_pix(
        &self,
        stores: &Stores,
        registration_id: RegistrationId,
    ) -> Result<PixDetails, TournamentError> {
        let registration = stores
            .registrations
            .get(registration_id)?
            .ok_or(TournamentError::RegistrationNotFound(registration_id))?;

        let amount = registration.category.entry_fee;
        let txid = registration.id.simple().to_string();
        let copy_paste = br_code_payload(
            &self.settings.key,
            &self.settings.receiver_name,
            &self.settings.receiver_city,
            amount,
            &txid,
        )?;
        let image = self.renderer.render(&copy_paste)?;
        let details = PixDetails {
            copy_paste,
            qr_code_base64: general_purpose::STANDARD.encode(image),
            amount,
            receiver_key: self.settings.key.clone(),
            receiver_name: self.settings.receiver_name.clone(),
            receiver_city: self.settings.receiver_city.clone(),
        };

        stores
            .registrations
            .modify(registration_id, |r, _| {
                r.pix = Some(details.clone());
                Ok::<(), TournamentError>(())
            })?
            .ok_or(TournamentError::RegistrationNotFound(registration_id))?;
        log::info!("PIX charge of {:.2} issued for registration {}", amount, registration_id);
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_check_value() {
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn payload_layout() {
        let payload = br_code_payload(
            "d2466986-7a7d-417c-95ea-65f58535031b",
            "MERCADO PAGO",
            "OSASCO",
            1.0,
            "***",
        )
        .unwrap();
        let body = "00020126580014BR.GOV.BCB.PIX0136d2466986-7a7d-417c-95ea-65f58535031b\
                    52040000530398654041.005802BR5912MERCADO PAGO6006OSASCO62070503***6304";
        assert!(payload.starts_with(body));
        assert_eq!(payload.len(), body.len() + 4);
        assert_eq!(&payload[body.len()..], format!("{:04X}", crc16(body.as_bytes())));
    }

    #[test]
    fn long_names_are_cut_and_accents_dropped() {
        let payload =
            br_code_payload("k", "Associação Esportiva de Santos Praia", "São Vicente", 80.0, "")
                .unwrap();
        assert!(payload.contains("5925Associao Esportiva de San"));
        assert!(payload.contains("6010So Vicente"));
        assert!(payload.contains("62070503***"));
        assert!(payload.contains("540580.00"));
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let longest = "k".repeat(MAX_PIX_KEY_LEN);
        let payload = br_code_payload(&longest, "ASSESP", "Santos", 10.0, "t").unwrap();
        assert!(payload.contains("2699"));

        let too_long = "k".repeat(MAX_PIX_KEY_LEN + 1);
        assert!(matches!(
            br_code_payload(&too_long, "ASSESP", "Santos", 10.0, "t"),
            Err(TournamentError::Validation(_))
        ));
        assert!(br_code_payload("k", "ASSESP", "Santos", 9_999_999_999.99, "t").is_ok());
        assert!(matches!(
            br_code_payload("k", "ASSESP", "Santos", 10_000_000_000.0, "t"),
            Err(TournamentError::Validation(_))
        ));
        assert!(matches!(
            br_code_payload("k", "ASSESP", "Santos", -1.0, "t"),
            Err(TournamentError::Validation(_))
        ));
    }

    #[test]
    fn svg_renderer_produces_svg() {
        let bytes = SvgQrRenderer.render("000201").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("<svg"));
    }
}
