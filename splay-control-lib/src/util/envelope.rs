//! The binary envelope the device pushes over the WebSocket when a client connects.
//!
//! It is a FlatBuffers message with this schema:
//!
//! ```text
//! namespace SPlayControl;
//!
//! table Header {
//!   token: string;
//! }
//!
//! table Message {
//!   header: Header;
//!   body: string;
//! }
//!
//! root_type Message;
//! ```
//!
//! Both fields of both tables are optional on the wire, so a decoded
//! [`Envelope`] keeps "no header" and "header without a token" apart.

use bytes::Bytes;
use flatbuffers::{
    FlatBufferBuilder, Follow, ForwardsUOffset, InvalidFlatbuffer, Table, VOffsetT, Verifiable,
    Verifier, WIPOffset,
};

const HEADER_VT_TOKEN: VOffsetT = 4;
const MESSAGE_VT_HEADER: VOffsetT = 4;
const MESSAGE_VT_BODY: VOffsetT = 6;

#[derive(Copy, Clone)]
struct HeaderTable<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for HeaderTable<'a> {
    type Inner = HeaderTable<'a>;

    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        HeaderTable {
            tab: Table::new(buf, loc),
        }
    }
}

impl<'a> HeaderTable<'a> {
    fn token(&self) -> Option<&'a str> {
        // Safety: only reachable through a root that passed verification.
        unsafe { self.tab.get::<ForwardsUOffset<&str>>(HEADER_VT_TOKEN, None) }
    }
}

impl Verifiable for HeaderTable<'_> {
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<&str>>("token", HEADER_VT_TOKEN, false)?
            .finish();
        Ok(())
    }
}

#[derive(Copy, Clone)]
struct MessageTable<'a> {
    tab: Table<'a>,
}

impl<'a> Follow<'a> for MessageTable<'a> {
    type Inner = MessageTable<'a>;

    #[inline]
    unsafe fn follow(buf: &'a [u8], loc: usize) -> Self::Inner {
        MessageTable {
            tab: Table::new(buf, loc),
        }
    }
}

impl<'a> MessageTable<'a> {
    fn header(&self) -> Option<HeaderTable<'a>> {
        // Safety: only reachable through a root that passed verification.
        unsafe {
            self.tab
                .get::<ForwardsUOffset<HeaderTable<'a>>>(MESSAGE_VT_HEADER, None)
        }
    }

    fn body(&self) -> Option<&'a str> {
        // Safety: only reachable through a root that passed verification.
        unsafe { self.tab.get::<ForwardsUOffset<&str>>(MESSAGE_VT_BODY, None) }
    }
}

impl Verifiable for MessageTable<'_> {
    fn run_verifier(v: &mut Verifier, pos: usize) -> Result<(), InvalidFlatbuffer> {
        v.visit_table(pos)?
            .visit_field::<ForwardsUOffset<HeaderTable>>("header", MESSAGE_VT_HEADER, false)?
            .visit_field::<ForwardsUOffset<&str>>("body", MESSAGE_VT_BODY, false)?
            .finish();
        Ok(())
    }
}

/// The `header` table of an [`Envelope`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub token: Option<String>,
}

/// An owned, decoded handshake message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    pub header: Option<EnvelopeHeader>,
    pub body: Option<String>,
}

impl Envelope {
    /// An envelope carrying only a session token, as the device sends it.
    pub fn with_token(token: &str) -> Self {
        Envelope {
            header: Some(EnvelopeHeader {
                token: Some(token.to_string()),
            }),
            body: None,
        }
    }

    /// The token, if both the header and its token field are present.
    pub fn token(&self) -> Option<&str> {
        self.header.as_ref()?.token.as_deref()
    }

    /// Decodes a buffer whose root offset starts at byte 0.
    pub fn decode(bytes: &[u8]) -> Result<Self, InvalidFlatbuffer> {
        flatbuffers::root::<MessageTable>(bytes).map(Envelope::from_table)
    }

    /// Decodes a buffer that starts with a 4-byte length prefix.
    pub fn decode_size_prefixed(bytes: &[u8]) -> Result<Self, InvalidFlatbuffer> {
        flatbuffers::size_prefixed_root::<MessageTable>(bytes).map(Envelope::from_table)
    }

    pub fn encode(&self) -> Bytes {
        self.build(false)
    }

    pub fn encode_size_prefixed(&self) -> Bytes {
        self.build(true)
    }

    fn from_table(message: MessageTable<'_>) -> Self {
        Envelope {
            header: message.header().map(|header| EnvelopeHeader {
                token: header.token().map(str::to_string),
            }),
            body: message.body().map(str::to_string),
        }
    }

    fn build(&self, size_prefixed: bool) -> Bytes {
        let mut fbb = FlatBufferBuilder::with_capacity(128);

        let header = self.header.as_ref().map(|header| {
            let token = header.token.as_deref().map(|token| fbb.create_string(token));
            let start = fbb.start_table();
            if let Some(token) = token {
                fbb.push_slot_always::<WIPOffset<_>>(HEADER_VT_TOKEN, token);
            }
            fbb.end_table(start)
        });
        let body = self.body.as_deref().map(|body| fbb.create_string(body));

        let start = fbb.start_table();
        if let Some(header) = header {
            fbb.push_slot_always::<WIPOffset<_>>(MESSAGE_VT_HEADER, header);
        }
        if let Some(body) = body {
            fbb.push_slot_always::<WIPOffset<_>>(MESSAGE_VT_BODY, body);
        }
        let root = fbb.end_table(start);

        if size_prefixed {
            fbb.finish_size_prefixed(root, None);
        } else {
            fbb.finish(root, None);
        }
        Bytes::copy_from_slice(fbb.finished_data())
    }
}
