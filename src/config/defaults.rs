//! The complete site configuration shipped with the storefront.
//!
//! Seeded into storage on first start and used to fill any section missing
//! from a stored document.

use serde_json::{json, Value};

pub fn default_site_config() -> Value {
    json!({
        "storeName": "Voltio Electric Supply",
        "logo": "/assets/logo.svg",
        "theme": {
            "primaryColor": "#1d4ed8",
            "secondaryColor": "#f59e0b",
            "accentColor": "#10b981",
            "backgroundColor": "#ffffff",
            "textColor": "#111827",
            "fontFamily": "Inter, sans-serif"
        },
        "hero": {
            "title": "Everything electrical, one counter away",
            "subtitle": "Cables, lighting, breakers and tools for pros and home projects.",
            "ctaText": "Browse catalog",
            "ctaLink": "#products",
            "backgroundImage": "/assets/hero.jpg"
        },
        "checkout": {
            "whatsappNumber": "5491100000000",
            "title": "Complete your order",
            "styles": {
                "buttonColor": "#25d366",
                "buttonTextColor": "#ffffff",
                "summaryBackground": "#f9fafb"
            },
            "paymentMethods": [
                { "id": "cash", "label": "Cash on pickup", "active": true, "discount": 0 },
                { "id": "transfer", "label": "Bank transfer", "active": true, "discount": 10 },
                { "id": "card", "label": "Credit card", "active": true, "discount": 0 }
            ],
            "fields": [
                { "id": "name", "label": "Full name", "type": "text", "required": true, "enabled": true },
                { "id": "phone", "label": "Phone", "type": "tel", "required": true, "enabled": true },
                { "id": "email", "label": "Email", "type": "email", "required": false, "enabled": true },
                { "id": "address", "label": "Delivery address", "type": "text", "required": false, "enabled": true }
            ]
        },
        "contact": {
            "phone": "+54 11 0000-0000",
            "email": "ventas@voltio.example",
            "address": "Av. Corrientes 1234, Buenos Aires",
            "whatsapp": "5491100000000",
            "actionButton": {
                "text": "Chat with us",
                "link": "https://wa.me/5491100000000",
                "color": "#25d366"
            }
        },
        "footer": {
            "text": "Voltio Electric Supply. All rights reserved.",
            "links": [],
            "socials": {}
        },
        "banners": [],
        "branches": [
            { "name": "Central", "address": "Av. Corrientes 1234", "phone": "+54 11 0000-0000", "hours": "Mon-Sat 8:00-18:00" }
        ],
        "features": {
            "showBrands": true,
            "showServices": true,
            "showBanners": true,
            "promotionCountdown": true
        },
        "sectionBackgrounds": {
            "products": "#ffffff",
            "services": "#f3f4f6",
            "brands": "#ffffff",
            "contact": "#111827"
        }
    })
}
