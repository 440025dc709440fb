//! Simulated collaborators for the card resource plugin
//!
//! Provides a reader driver answering a fixed table of APDUs, a smart card
//! carrying that table and an in-memory Card Resource Service. None of this
//! touches real hardware.
//!
//! ```
//! use std::sync::Arc;
//! use cardresource_spi::prelude::*;
//! use cardresource_stub::{StubCardResourceService, StubReader, StubSmartCard};
//!
//! let card = StubSmartCard::new([0x3B, 0x88])
//!     .with_simulated_command("8084000004", "001122339000")
//!     .unwrap();
//! let reader = Arc::new(StubReader::new("contactReader", false));
//! reader.insert_card(card);
//!
//! let service = StubCardResourceService::new()
//!     .with_resource("profile1", reader.card_resource().unwrap());
//! service.start();
//!
//! let resource = service.get_card_resource("profile1").unwrap().unwrap();
//! let response = resource.reader().transmit_apdu(&[0x80, 0x84, 0x00, 0x00, 0x04]).unwrap();
//! assert_eq!(hex::encode_upper(response), "001122339000");
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod card;
mod reader;
mod service;

pub use card::StubSmartCard;
pub use reader::StubReader;
pub use service::StubCardResourceService;
