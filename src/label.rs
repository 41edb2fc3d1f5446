//! AWB label rendering.
//!
//! A label is a pure projection of one persisted order plus its optional
//! parcel measurement, computed fresh for every print. Measurement fetches
//! for a batch run concurrently and independently: one failed fetch
//! degrades that label to placeholders without touching the others.

use std::fs;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{instrument, warn};

use crate::{
    client::ServiceClient,
    errors::ConsoleError,
    models::{ParcelMeasurement, PersistedOrder},
};

/// Contact phone printed on every label footer.
pub const LABEL_CONTACT_PHONE: &str = "+959788889337";
/// Route code printed in the label header.
pub const LABEL_ROUTE_CODE: &str = "DOM - MDY - A01";
/// Shown for a weight or size that has not been recorded yet.
pub const MEASUREMENT_PLACEHOLDER: &str = "---";
/// Shown when neither an override fee nor a destination base fee exists.
pub const FEE_PLACEHOLDER: &str = "N/A";

const BARCODE_URL: &str = "https://barcode.tec-it.com/barcode.ashx";
const QR_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

#[derive(Debug, Clone, PartialEq)]
pub struct LabelParty {
    pub name: String,
    pub phone: String,
    /// "{street address}, {city name}"
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub tracking_id: String,
    pub barcode_payload: String,
    pub qr_payload: String,
    pub sender: LabelParty,
    pub receiver: LabelParty,
    pub delivery_fee: String,
    pub cod: String,
    pub total_cod: String,
    pub weight: String,
    pub size: String,
    pub contact_phone: String,
    pub created_date: String,
}

/// Projects one order (and whatever measurement data is available) onto
/// the fixed label field set.
pub fn render(order: &PersistedOrder, measurement: Option<&ParcelMeasurement>) -> Label {
    let shipper = order.shipper.as_ref();
    let sender_name = order
        .pick_up_name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| shipper.and_then(|s| s.name.clone()))
        .unwrap_or_default();
    let sender_phone = order
        .pick_up_phone
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| shipper.and_then(|s| s.phone.clone()))
        .unwrap_or_default();
    let pickup_city = order
        .pick_up_city
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let destination_city = order
        .destination_city
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_default();

    let delivery_fee = order
        .deli_fee
        .or_else(|| order.destination_city.as_ref().and_then(|c| c.fee))
        .map(|fee| fee.to_string())
        .unwrap_or_else(|| FEE_PLACEHOLDER.to_string());

    Label {
        tracking_id: order.tracking_id.clone(),
        barcode_payload: order.tracking_id.clone(),
        qr_payload: order.tracking_id.clone(),
        sender: LabelParty {
            name: sender_name,
            phone: sender_phone,
            address: format!(
                "{}, {}",
                order.pick_up_address.clone().unwrap_or_default(),
                pickup_city
            ),
        },
        receiver: LabelParty {
            name: order.cus_name.clone(),
            phone: order.cus_phone.clone(),
            address: format!("{}, {}", order.cus_address, destination_city),
        },
        delivery_fee,
        cod: order
            .cod
            .map(|c| c.to_string())
            .unwrap_or_else(|| "0".to_string()),
        total_cod: order
            .total_cod
            .map(|c| c.to_string())
            .unwrap_or_else(|| FEE_PLACEHOLDER.to_string()),
        weight: measurement
            .and_then(|m| m.kg)
            .map(|kg| kg.to_string())
            .unwrap_or_else(|| MEASUREMENT_PLACEHOLDER.to_string()),
        size: measurement
            .and_then(|m| m.cm)
            .map(|cm| cm.to_string())
            .unwrap_or_else(|| MEASUREMENT_PLACEHOLDER.to_string()),
        contact_phone: LABEL_CONTACT_PHONE.to_string(),
        created_date: order
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| FEE_PLACEHOLDER.to_string()),
    }
}

/// Fetches each order's measurement concurrently and renders its label.
///
/// Completion order between fetches is not guaranteed; each one updates
/// only its own label, so the returned labels follow the input order.
pub async fn render_batch(client: &ServiceClient, orders: &[PersistedOrder]) -> Vec<Label> {
    let fetches = orders.iter().map(|order| async {
        let measurement = match client.get_measurement(&order.tracking_id).await {
            Ok(measurement) => Some(measurement),
            Err(e) => {
                warn!(tracking_id = %order.tracking_id, error = %e,
                      "measurement fetch failed; label degrades to placeholders");
                None
            }
        };
        render(order, measurement.as_ref())
    });
    join_all(fetches).await
}

impl Label {
    /// Fixed-geometry A6 (105×148 mm) markup for preview and printing.
    pub fn to_html(&self) -> String {
        let barcode_src = format!(
            "{}?data={}&code=Code128&translate-esc=false",
            BARCODE_URL,
            escape_html(&self.barcode_payload)
        );
        let qr_src = format!(
            "{}?data={}&size=70x70",
            QR_URL,
            escape_html(&self.qr_payload)
        );

        format!(
            r#"<div style="width:105mm;height:148mm;border:1px solid #999;font-family:sans-serif;font-size:8px;display:flex;flex-direction:column;justify-content:space-between;padding:8px;">
  <div style="display:flex;justify-content:space-between;border-bottom:1px solid #999;padding-bottom:4px;">
    <span style="font-weight:800;font-size:12px;">{route}</span>
    <span style="font-weight:700;font-size:12px;">Dome</span>
  </div>
  <div style="text-align:center;border-bottom:1px solid #999;padding:6px 0;">
    <img src="{barcode}" alt="Barcode" style="height:48px;"/>
  </div>
  <div style="text-align:center;font-weight:800;font-size:11px;border-bottom:1px solid #999;padding:6px 0;">TRACKING ID : {tracking}</div>
  <div style="border-bottom:1px solid #999;padding:8px 0;">
    <div style="font-weight:800;">Sender</div>
    <p style="margin:2px 0;font-weight:800;">{sender_name}</p>
    <p style="margin:2px 0;font-weight:800;">{sender_phone}</p>
    <p style="margin:2px 0;">{sender_address}</p>
  </div>
  <div style="border-bottom:1px solid #999;padding:8px 0;">
    <div style="font-weight:800;">Receiver</div>
    <p style="margin:2px 0;font-weight:800;">{receiver_name}</p>
    <p style="margin:2px 0;font-weight:800;">{receiver_phone}</p>
    <p style="margin:2px 0;">{receiver_address}</p>
  </div>
  <div style="display:grid;grid-template-columns:1fr 1fr;border-bottom:1px solid #999;text-align:center;">
    <div style="border-right:1px solid #999;padding:6px;">
      <div style="font-weight:700;font-size:11px;">{fee}</div>
      <div style="border-top:1px solid #999;font-size:11px;">COD : <span style="font-weight:800;">{cod}</span></div>
      <div style="border-top:1px solid #999;font-size:11px;">Total : <span style="font-weight:800;">{total_cod}</span></div>
      <div style="border-top:1px solid #999;font-weight:700;">KG {kg} | CM {cm}</div>
    </div>
    <div style="display:flex;align-items:center;justify-content:center;">
      <img src="{qr}" alt="QR Code" style="height:80px;width:80px;"/>
    </div>
  </div>
  <div style="display:flex;justify-content:space-between;font-weight:800;padding-top:4px;">
    <span>{contact}</span>
    <span>Create at : {created}</span>
  </div>
</div>
"#,
            route = LABEL_ROUTE_CODE,
            barcode = barcode_src,
            tracking = escape_html(&self.tracking_id),
            sender_name = escape_html(&self.sender.name),
            sender_phone = escape_html(&self.sender.phone),
            sender_address = escape_html(&self.sender.address),
            receiver_name = escape_html(&self.receiver.name),
            receiver_phone = escape_html(&self.receiver.phone),
            receiver_address = escape_html(&self.receiver.address),
            fee = escape_html(&self.delivery_fee),
            cod = escape_html(&self.cod),
            total_cod = escape_html(&self.total_cod),
            kg = escape_html(&self.weight),
            cm = escape_html(&self.size),
            qr = qr_src,
            contact = escape_html(&self.contact_phone),
            created = escape_html(&self.created_date),
        )
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Receives rendered label markup for printing.
pub trait PrintSink {
    fn print(&self, label: &Label, html: &str) -> Result<(), ConsoleError>;
}

/// Writes one preview file per label into an output directory; the file is
/// then handed to whatever the platform uses to print HTML.
pub struct FilePrinter {
    out_dir: PathBuf,
}

impl FilePrinter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

impl PrintSink for FilePrinter {
    #[instrument(skip(self, label, html), fields(tracking_id = %label.tracking_id))]
    fn print(&self, label: &Label, html: &str) -> Result<(), ConsoleError> {
        fs::create_dir_all(&self.out_dir)
            .map_err(|e| ConsoleError::Internal(format!("Failed to create label dir: {}", e)))?;
        let path = self.out_dir.join(format!("{}.html", label.tracking_id));
        fs::write(&path, html)
            .map_err(|e| ConsoleError::Internal(format!("Failed to write label: {}", e)))?;
        Ok(())
    }
}
