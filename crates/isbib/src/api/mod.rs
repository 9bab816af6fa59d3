use serde::de::DeserializeOwned;

use crate::{Error, ErrorKind};

pub(crate) mod google_books;

pub use google_books::GoogleBooks;

/// Names of the catalog sources that can be used in `api_source_priority`.
pub const SOURCES: &[&str] = &[google_books::NAME];

/// The HTTP seam of every catalog, allows the catalogs to be tested without a network.
pub trait Client
where
    Self: Default,
{
    /// Sends a GET request to `url` and deserializes the JSON body.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::IO`] when the request fails or the response has an error status and
    /// [`ErrorKind::Deserialize`] when the body is not the expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        // the request URL can carry an API key, it must not end up in error messages
        let response = self
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::wrap(ErrorKind::IO, e.without_url()))?;

        response
            .json()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e.without_url()))
    }
}

/// A [`Client`] answering every request with a canned body, no network is involved.
#[cfg(test)]
pub(crate) mod mock {
    use std::{
        cell::RefCell,
        io::{Read, Write},
        marker::PhantomData,
        net::TcpListener,
        thread,
    };

    use serde::de::DeserializeOwned;

    use super::Client;
    use crate::{Error, ErrorKind};

    thread_local! {
        static REQUESTED: RefCell<Vec<String>> = RefCell::new(Vec::new());
    }

    /// The URL of the latest request a [`MockClient`] made on this thread.
    pub(crate) fn last_requested() -> Option<String> {
        REQUESTED.with(|urls| urls.borrow().last().cloned())
    }

    /// Asserts the URL of the latest request a [`MockClient`] made on this thread.
    macro_rules! assert_url {
        ($expected:expr) => {
            assert_eq!(
                Some($expected),
                crate::api::mock::last_requested().as_deref(),
                "unexpected request URL"
            )
        };
    }

    /// The body, or failure, of every response of a [`MockClient`].
    pub(crate) trait Producer: Default {
        fn body() -> Result<String, Error>;
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P = EmptyBody> {
        _producer: PhantomData<P>,
    }

    impl<P: Producer> Client for MockClient<P> {
        fn get_json<T>(&self, url: &str) -> Result<T, Error>
        where
            T: DeserializeOwned,
        {
            REQUESTED.with(|urls| urls.borrow_mut().push(url.to_owned()));

            let body = P::body()?;
            serde_json::from_str(&body).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
        }
    }

    /// Declares unit structs implementing [`Producer`] with the given body expressions.
    macro_rules! producers {
        ($($name:ident => $body:expr),* $(,)?) => {
            $(
                #[derive(Default)]
                pub(crate) struct $name;

                impl crate::api::mock::Producer for $name {
                    fn body() -> Result<String, crate::Error> {
                        $body
                    }
                }
            )*
        };
    }

    producers! {
        EmptyBody => Ok(String::new()),
        NetworkError => Err(Error::new(ErrorKind::IO, "Network error")),
    }

    /// Starts an HTTP server on a free local port answering every request with `status` and
    /// `body`, returns the URL of its volumes endpoint.
    ///
    /// The server thread lives until the test binary exits.
    pub(crate) fn local_server(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Cannot bind a local port");
        let addr = listener.local_addr().expect("Bound listener has an address");

        thread::spawn(move || {
            for mut stream in listener.incoming().flatten() {
                let mut request = Vec::new();
                let mut buf = [0; 1024];
                // GET requests have no body, the headers end the request
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        format!("http://{addr}/books/v1/volumes")
    }

    pub(crate) use {assert_url, producers};
}
