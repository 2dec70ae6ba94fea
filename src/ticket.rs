//! Ticket issuance: token generation, QR encoding, e-ticket rendering.
//!
//! A ticket number is a `TKT_`-prefixed v4 UUID in simple form (128 bits of
//! entropy). The QR payload is the JSON-encoded verification triple
//! `{event_id, user_id, ticket_number}`, rendered as a PNG and embedded in
//! the e-ticket HTML as a base64 data URI.

use crate::error::{Error, Result};
use crate::types::Event;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use serde::Serialize;
use std::io::Cursor;
use uuid::Uuid;

/// Pixels per QR module.
const QR_SCALE: u32 = 8;
/// Quiet-zone width in modules on each side.
const QR_QUIET_ZONE: u32 = 4;

/// Generate a unique event key.
///
/// `EVT_` plus the first eight hex characters of a v4 UUID.
#[must_use]
pub fn generate_event_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("EVT_{}", &uuid[..8])
}

/// Generate a unique ticket number.
///
/// `TKT_` plus a full v4 UUID in simple form.
#[must_use]
pub fn generate_ticket_number() -> String {
    format!("TKT_{}", Uuid::new_v4().simple())
}

/// Verification payload encoded into the QR code.
#[derive(Debug, Serialize)]
struct QrPayload<'a> {
    event_id: &'a str,
    user_id: &'a str,
    ticket_number: &'a str,
}

/// Render the verification payload as a QR code PNG.
///
/// # Errors
///
/// Returns error if QR encoding or PNG serialization fails.
pub fn qr_png(event_id: &str, user_id: &str, ticket_number: &str) -> Result<Vec<u8>> {
    let payload = serde_json::to_string(&QrPayload {
        event_id,
        user_id,
        ticket_number,
    })
    .map_err(|e| Error::Internal(format!("QR payload encoding failed: {e}")))?;

    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| Error::Internal(format!("QR encoding failed: {e}")))?;

    let modules = u32::try_from(code.width())
        .map_err(|e| Error::Internal(format!("QR width overflow: {e}")))?;
    let colors = code.to_colors();
    let dim = (modules + 2 * QR_QUIET_ZONE) * QR_SCALE;

    let mut img = GrayImage::from_pixel(dim, dim, Luma([255u8]));
    for (i, color) in colors.iter().enumerate() {
        if *color == Color::Dark {
            let i = u32::try_from(i)
                .map_err(|e| Error::Internal(format!("QR index overflow: {e}")))?;
            let x0 = (i % modules + QR_QUIET_ZONE) * QR_SCALE;
            let y0 = (i / modules + QR_QUIET_ZONE) * QR_SCALE;
            for dy in 0..QR_SCALE {
                for dx in 0..QR_SCALE {
                    img.put_pixel(x0 + dx, y0 + dy, Luma([0u8]));
                }
            }
        }
    }

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::Internal(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}

/// Wrap PNG bytes as an embeddable base64 data URI.
#[must_use]
pub fn qr_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// Render the HTML e-ticket document for one registration.
///
/// Embeds the event metadata, the QR data URI, and the ticket number.
#[must_use]
pub fn render_eticket_html(event: &Event, ticket_number: &str, qr_data_uri: &str) -> String {
    let date = event.date.format("%A, %B %e, %Y");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title} - E-Ticket</title>
</head>
<body style="font-family: Arial, sans-serif; background-color: #f5f5f5; margin: 0; padding: 20px;">
    <div style="max-width: 600px; margin: 20px auto; background: white; border-radius: 15px; overflow: hidden;">
        <div style="background-color: #4f46e5; color: white; padding: 40px 30px; text-align: center;">
            <h1 style="margin: 0; font-size: 28px;">{title}</h1>
            <p style="margin: 10px 0 0 0; opacity: 0.9;">E-Ticket</p>
        </div>
        <div style="padding: 30px;">
            <table style="width: 100%; border-collapse: collapse;">
                <tr>
                    <td style="color: #6b7280; padding: 10px 0;">Date</td>
                    <td style="color: #111827; text-align: right; font-weight: bold;">{date}</td>
                </tr>
                <tr>
                    <td style="color: #6b7280; padding: 10px 0;">Time</td>
                    <td style="color: #111827; text-align: right; font-weight: bold;">{time}</td>
                </tr>
                <tr>
                    <td style="color: #6b7280; padding: 10px 0;">Location</td>
                    <td style="color: #111827; text-align: right; font-weight: bold;">{address}</td>
                </tr>
                <tr>
                    <td style="color: #6b7280; padding: 10px 0;">Category</td>
                    <td style="color: #111827; text-align: right; font-weight: bold;">{category}</td>
                </tr>
            </table>
            <div style="background-color: #fef3c7; border-left: 4px solid #f59e0b; padding: 15px; margin: 25px 0;">
                <strong>Important:</strong> Please present this ticket at the entrance with the QR code clearly visible.
            </div>
            <div style="text-align: center; padding: 30px; background-color: #f9fafb; border-radius: 12px;">
                <h3 style="margin: 0 0 15px 0; color: #374151;">Your Ticket QR Code</h3>
                <img src="{qr}" alt="Event QR Code" style="width: 200px; height: 200px;"/>
                <div style="font-family: monospace; color: #4f46e5; background-color: #eef2ff; padding: 12px 20px; display: inline-block; margin-top: 15px;">{ticket_number}</div>
            </div>
        </div>
        <div style="text-align: center; padding: 25px; color: #6b7280; font-size: 13px; background-color: #f9fafb;">
            <p style="margin: 0 0 5px 0;">This ticket is valid for one person only and cannot be resold.</p>
            <p style="margin: 0;">For questions or support, please contact the event organizer.</p>
        </div>
    </div>
</body>
</html>
"#,
        title = event.title,
        date = date,
        time = event.time,
        address = event.address,
        category = event.category,
        qr = qr_data_uri,
        ticket_number = ticket_number,
    )
}
