//! Verse and hadith fetching against a mock API.

use tilawah_lib::config::Config;
use tilawah_lib::content::ContentFetcher;
use tilawah_lib::hadith::HadithClient;
use tilawah_lib::types::{Language, Position};
use tilawah_lib::Error;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        quran_api: server.uri(),
        hadith_api: server.uri(),
        ..Config::default()
    }
}

fn verse_body() -> serde_json::Value {
    serde_json::json!({
        "code": 200,
        "status": "OK",
        "data": {
            "number": 12,
            "text": "اور وہی لوگ اپنے رب کی ہدایت پر ہیں",
            "surah": {
                "number": 2,
                "name": "سورة البقرة",
                "englishName": "Al-Baqarah",
                "englishNameTranslation": "The Cow",
                "revelationType": "Medinan",
                "numberOfAyahs": 286
            },
            "numberInSurah": 5
        }
    })
}

mod verses {
    use super::*;

    #[tokio::test]
    async fn urdu_verse_with_alafasy_audio() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ayah/2:5/ur.ahmedali"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(verse_body()))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&config_for(&server));
        let position = Position {
            chapter: 2,
            verse: 5,
            language: Language::Ur,
            reciter_id: 1,
        };
        let resource = fetcher.fetch(&position).await.unwrap();

        assert_eq!(resource.content.surah.english_name, "Al-Baqarah");
        assert_eq!(resource.content.surah.number_of_ayahs, 286);
        assert!(resource.content.text.starts_with("اور"));
        assert_eq!(
            resource.image_url,
            "https://cdn.islamic.network/quran/images/2_5.png"
        );
        assert_eq!(
            resource.audio_url.as_deref(),
            Some("https://everyayah.com/data/Alafasy_128kbps/002005.mp3")
        );
    }

    #[tokio::test]
    async fn upstream_failure_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&config_for(&server));
        let err = fetcher.fetch(&Position::default()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 503 }));
        assert_eq!(err.notice_title(), "Error");
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&config_for(&server));
        let err = fetcher.fetch(&Position::default()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn out_of_range_verse_never_reaches_the_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(verse_body()))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = ContentFetcher::new(&config_for(&server));
        let position = Position {
            chapter: 114,
            verse: 7,
            ..Position::default()
        };
        assert!(matches!(
            fetcher.fetch(&position).await,
            Err(Error::InvalidInput(_))
        ));
    }
}

mod hadith {
    use super::*;

    #[tokio::test]
    async fn numbered_hadith_is_fetched_from_its_book() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bukhari/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "book": "Sahih al-Bukhari",
                    "bookName": " Revelation ",
                    "chapterName": "How the Divine Revelation started",
                    "hadith_english": "Actions are judged by intentions...",
                    "header": "Narrated 'Umar bin Al-Khattab:",
                    "id": 1,
                    "refno": "Sahih al-Bukhari 1"
                }
            })))
            .mount(&server)
            .await;

        let client = HadithClient::new(&config_for(&server));
        let hadith = client.fetch("bukhari", Some(1)).await.unwrap();
        assert_eq!(hadith.refno, "Sahih al-Bukhari 1");
        assert_eq!(hadith.book_name.trim(), "Revelation");
    }

    #[tokio::test]
    async fn out_of_range_number_is_rejected_locally() {
        let server = MockServer::start().await;
        let client = HadithClient::new(&config_for(&server));

        let err = client.fetch("muslim", Some(3033)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Hadith number. Please enter a number between 1 and 3032."
        );
    }

    #[tokio::test]
    async fn failed_request_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HadithClient::new(&config_for(&server));
        let err = client.fetch("tirmidhi", None).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 404 }));
    }
}
