//! Wire protocol bindings.
//!
//! The protocol code is generated from the XML definitions under
//! `protocols/` with `wayland-scanner`, the same way `wayland-protocols`
//! generates its modules. Only the sides actually consumed are generated:
//! the compositor module implements the notification-area server side and
//! the background binary consumes the background client side.

pub mod notification_area {
    //! notification-area protocol, unstable v1

    pub mod server {
        #![allow(non_upper_case_globals, missing_docs, clippy::all)]
        //! Server-side API of the notification-area protocol
        use wayland_server;
        use wayland_server::protocol::*;

        pub mod __interfaces {
            use wayland_server::protocol::__interfaces::*;
            wayland_scanner::generate_interfaces!("./protocols/notification-area-unstable-v1.xml");
        }
        use self::__interfaces::*;

        wayland_scanner::generate_server_code!("./protocols/notification-area-unstable-v1.xml");
    }
}

pub mod background {
    //! background protocol, unstable v1

    pub mod client {
        #![allow(non_upper_case_globals, missing_docs, clippy::all)]
        //! Client-side API of the background protocol
        use wayland_client;
        use wayland_client::protocol::*;

        pub mod __interfaces {
            use wayland_client::protocol::__interfaces::*;
            wayland_scanner::generate_interfaces!("./protocols/background-unstable-v1.xml");
        }
        use self::__interfaces::*;

        wayland_scanner::generate_client_code!("./protocols/background-unstable-v1.xml");
    }
}
