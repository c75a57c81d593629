//! Static tables: chapters, paras, reciters and hadith books.
//!
//! Chapter start pages follow the 604-page Madani mushaf.

use serde::Serialize;
use std::fmt;

pub const CHAPTER_COUNT: u16 = 114;
pub const PARA_COUNT: u8 = 30;
pub const MUSHAF_PAGES: u32 = 604;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Revelation {
    Meccan,
    Medinan,
}

impl fmt::Display for Revelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revelation::Meccan => f.write_str("Meccan"),
            Revelation::Medinan => f.write_str("Medinan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub number: u16,
    pub name: &'static str,
    pub english_name: &'static str,
    pub verses: u32,
    pub revelation: Revelation,
    pub start_page: u32,
}

impl Chapter {
    /// Last mushaf page holding verses of this chapter.
    pub fn end_page(&self) -> u32 {
        match chapter(self.number + 1) {
            Some(next) if next.start_page > self.start_page => next.start_page - 1,
            Some(_) => self.start_page,
            None => MUSHAF_PAGES,
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.end_page() - self.start_page + 1
    }
}

/// A (chapter, verse) pair as used in references like `2:255`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct VerseRef {
    pub chapter: u16,
    pub verse: u32,
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Para {
    pub number: u8,
    pub name: &'static str,
    pub english_name: &'static str,
    pub start: VerseRef,
    pub start_page: u32,
}

impl Para {
    /// Last verse belonging to this para.
    pub fn end(&self) -> VerseRef {
        match para(self.number + 1) {
            Some(next) if next.start.verse > 1 => VerseRef {
                chapter: next.start.chapter,
                verse: next.start.verse - 1,
            },
            Some(next) => {
                let prev = next.start.chapter - 1;
                VerseRef {
                    chapter: prev,
                    verse: chapter(prev).map(|c| c.verses).unwrap_or(1),
                }
            }
            None => VerseRef { chapter: CHAPTER_COUNT, verse: 6 },
        }
    }

    pub fn end_page(&self) -> u32 {
        match para(self.number + 1) {
            Some(next) => next.start_page - 1,
            None => MUSHAF_PAGES,
        }
    }

    pub fn total_pages(&self) -> u32 {
        self.end_page() - self.start_page + 1
    }

    /// Human readable verse range, e.g. `2:142 - 2:252`
    pub fn verses_range(&self) -> String {
        format!("{} - {}", self.start, self.end())
    }

    pub fn page_range(&self) -> String {
        format!("{} - {}", self.start_page, self.end_page())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reciter {
    pub id: u32,
    pub name: &'static str,
    /// Folder on the audio CDN holding this reciter's files
    pub subfolder: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HadithBook {
    pub name: &'static str,
    pub value: &'static str,
    pub limit: u32,
}

const fn entry(
    number: u16,
    name: &'static str,
    english_name: &'static str,
    verses: u32,
    revelation: Revelation,
    start_page: u32,
) -> Chapter {
    Chapter { number, name, english_name, verses, revelation, start_page }
}

const fn juz(
    number: u8,
    name: &'static str,
    english_name: &'static str,
    start: (u16, u32),
    start_page: u32,
) -> Para {
    Para {
        number,
        name,
        english_name,
        start: VerseRef { chapter: start.0, verse: start.1 },
        start_page,
    }
}

pub static CHAPTERS: [Chapter; 114] = [
    entry(1, "Al-Fatihah", "The Opening", 7, Revelation::Meccan, 1),
    entry(2, "Al-Baqarah", "The Cow", 286, Revelation::Medinan, 2),
    entry(3, "Ali 'Imran", "Family of Imran", 200, Revelation::Medinan, 50),
    entry(4, "An-Nisa", "The Women", 176, Revelation::Medinan, 77),
    entry(5, "Al-Ma'idah", "The Table Spread", 120, Revelation::Medinan, 106),
    entry(6, "Al-An'am", "The Cattle", 165, Revelation::Meccan, 128),
    entry(7, "Al-A'raf", "The Heights", 206, Revelation::Meccan, 151),
    entry(8, "Al-Anfal", "The Spoils of War", 75, Revelation::Medinan, 177),
    entry(9, "At-Tawbah", "The Repentance", 129, Revelation::Medinan, 187),
    entry(10, "Yunus", "Jonah", 109, Revelation::Meccan, 208),
    entry(11, "Hud", "Hud", 123, Revelation::Meccan, 221),
    entry(12, "Yusuf", "Joseph", 111, Revelation::Meccan, 235),
    entry(13, "Ar-Ra'd", "The Thunder", 43, Revelation::Medinan, 249),
    entry(14, "Ibrahim", "Abraham", 52, Revelation::Meccan, 255),
    entry(15, "Al-Hijr", "The Rocky Tract", 99, Revelation::Meccan, 262),
    entry(16, "An-Nahl", "The Bee", 128, Revelation::Meccan, 267),
    entry(17, "Al-Isra", "The Night Journey", 111, Revelation::Meccan, 282),
    entry(18, "Al-Kahf", "The Cave", 110, Revelation::Meccan, 293),
    entry(19, "Maryam", "Mary", 98, Revelation::Meccan, 305),
    entry(20, "Taha", "Ta-Ha", 135, Revelation::Meccan, 312),
    entry(21, "Al-Anbya", "The Prophets", 112, Revelation::Meccan, 322),
    entry(22, "Al-Hajj", "The Pilgrimage", 78, Revelation::Medinan, 332),
    entry(23, "Al-Mu'minun", "The Believers", 118, Revelation::Meccan, 342),
    entry(24, "An-Nur", "The Light", 64, Revelation::Medinan, 350),
    entry(25, "Al-Furqan", "The Criterion", 77, Revelation::Meccan, 359),
    entry(26, "Ash-Shu'ara", "The Poets", 227, Revelation::Meccan, 367),
    entry(27, "An-Naml", "The Ant", 93, Revelation::Meccan, 377),
    entry(28, "Al-Qasas", "The Stories", 88, Revelation::Meccan, 385),
    entry(29, "Al-'Ankabut", "The Spider", 69, Revelation::Meccan, 396),
    entry(30, "Ar-Rum", "The Romans", 60, Revelation::Meccan, 404),
    entry(31, "Luqman", "Luqman", 34, Revelation::Meccan, 411),
    entry(32, "As-Sajdah", "The Prostration", 30, Revelation::Meccan, 415),
    entry(33, "Al-Ahzab", "The Combined Forces", 73, Revelation::Medinan, 418),
    entry(34, "Saba", "Sheba", 54, Revelation::Meccan, 428),
    entry(35, "Fatir", "Originator", 45, Revelation::Meccan, 434),
    entry(36, "Ya-Sin", "Ya Sin", 83, Revelation::Meccan, 440),
    entry(37, "As-Saffat", "Those who set the Ranks", 182, Revelation::Meccan, 446),
    entry(38, "Sad", "The Letter Saad", 88, Revelation::Meccan, 453),
    entry(39, "Az-Zumar", "The Troops", 75, Revelation::Meccan, 458),
    entry(40, "Ghafir", "The Forgiver", 85, Revelation::Meccan, 467),
    entry(41, "Fussilat", "Explained in Detail", 54, Revelation::Meccan, 477),
    entry(42, "Ash-Shuraa", "The Consultation", 53, Revelation::Meccan, 483),
    entry(43, "Az-Zukhruf", "The Ornaments of Gold", 89, Revelation::Meccan, 489),
    entry(44, "Ad-Dukhan", "The Smoke", 59, Revelation::Meccan, 496),
    entry(45, "Al-Jathiyah", "The Crouching", 37, Revelation::Meccan, 499),
    entry(46, "Al-Ahqaf", "The Wind-Curved Sandhills", 35, Revelation::Meccan, 502),
    entry(47, "Muhammad", "Muhammad", 38, Revelation::Medinan, 507),
    entry(48, "Al-Fath", "The Victory", 29, Revelation::Medinan, 511),
    entry(49, "Al-Hujurat", "The Rooms", 18, Revelation::Medinan, 515),
    entry(50, "Qaf", "The Letter Qaf", 45, Revelation::Meccan, 518),
    entry(51, "Adh-Dhariyat", "The Winnowing Winds", 60, Revelation::Meccan, 520),
    entry(52, "At-Tur", "The Mount", 49, Revelation::Meccan, 523),
    entry(53, "An-Najm", "The Star", 62, Revelation::Meccan, 526),
    entry(54, "Al-Qamar", "The Moon", 55, Revelation::Meccan, 528),
    entry(55, "Ar-Rahman", "The Beneficent", 78, Revelation::Medinan, 531),
    entry(56, "Al-Waqi'ah", "The Inevitable", 96, Revelation::Meccan, 534),
    entry(57, "Al-Hadid", "The Iron", 29, Revelation::Medinan, 537),
    entry(58, "Al-Mujadila", "The Pleading Woman", 22, Revelation::Medinan, 542),
    entry(59, "Al-Hashr", "The Exile", 24, Revelation::Medinan, 545),
    entry(60, "Al-Mumtahanah", "She that is to be examined", 13, Revelation::Medinan, 549),
    entry(61, "As-Saf", "The Ranks", 14, Revelation::Medinan, 551),
    entry(62, "Al-Jumu'ah", "The Congregation", 11, Revelation::Medinan, 553),
    entry(63, "Al-Munafiqun", "The Hypocrites", 11, Revelation::Medinan, 554),
    entry(64, "At-Taghabun", "The Mutual Disillusion", 18, Revelation::Medinan, 556),
    entry(65, "At-Talaq", "The Divorce", 12, Revelation::Medinan, 558),
    entry(66, "At-Tahrim", "The Prohibition", 12, Revelation::Medinan, 560),
    entry(67, "Al-Mulk", "The Sovereignty", 30, Revelation::Meccan, 562),
    entry(68, "Al-Qalam", "The Pen", 52, Revelation::Meccan, 564),
    entry(69, "Al-Haqqah", "The Reality", 52, Revelation::Meccan, 566),
    entry(70, "Al-Ma'arij", "The Ascending Stairways", 44, Revelation::Meccan, 568),
    entry(71, "Nuh", "Noah", 28, Revelation::Meccan, 570),
    entry(72, "Al-Jinn", "The Jinn", 28, Revelation::Meccan, 572),
    entry(73, "Al-Muzzammil", "The Enshrouded One", 20, Revelation::Meccan, 574),
    entry(74, "Al-Muddaththir", "The Cloaked One", 56, Revelation::Meccan, 575),
    entry(75, "Al-Qiyamah", "The Resurrection", 40, Revelation::Meccan, 577),
    entry(76, "Al-Insan", "The Man", 31, Revelation::Medinan, 578),
    entry(77, "Al-Mursalat", "The Emissaries", 50, Revelation::Meccan, 580),
    entry(78, "An-Naba", "The Tidings", 40, Revelation::Meccan, 582),
    entry(79, "An-Nazi'at", "Those who drag forth", 46, Revelation::Meccan, 583),
    entry(80, "'Abasa", "He Frowned", 42, Revelation::Meccan, 585),
    entry(81, "At-Takwir", "The Overthrowing", 29, Revelation::Meccan, 586),
    entry(82, "Al-Infitar", "The Cleaving", 19, Revelation::Meccan, 587),
    entry(83, "Al-Mutaffifin", "The Defrauding", 36, Revelation::Meccan, 587),
    entry(84, "Al-Inshiqaq", "The Sundering", 25, Revelation::Meccan, 589),
    entry(85, "Al-Buruj", "The Mansions of the Stars", 22, Revelation::Meccan, 590),
    entry(86, "At-Tariq", "The Nightcomer", 17, Revelation::Meccan, 591),
    entry(87, "Al-A'la", "The Most High", 19, Revelation::Meccan, 591),
    entry(88, "Al-Ghashiyah", "The Overwhelming", 26, Revelation::Meccan, 592),
    entry(89, "Al-Fajr", "The Dawn", 30, Revelation::Meccan, 593),
    entry(90, "Al-Balad", "The City", 20, Revelation::Meccan, 594),
    entry(91, "Ash-Shams", "The Sun", 15, Revelation::Meccan, 595),
    entry(92, "Al-Layl", "The Night", 21, Revelation::Meccan, 595),
    entry(93, "Ad-Duhaa", "The Morning Hours", 11, Revelation::Meccan, 596),
    entry(94, "Ash-Sharh", "The Relief", 8, Revelation::Meccan, 596),
    entry(95, "At-Tin", "The Fig", 8, Revelation::Meccan, 597),
    entry(96, "Al-'Alaq", "The Clot", 19, Revelation::Meccan, 597),
    entry(97, "Al-Qadr", "The Power", 5, Revelation::Meccan, 598),
    entry(98, "Al-Bayyinah", "The Clear Proof", 8, Revelation::Medinan, 598),
    entry(99, "Az-Zalzalah", "The Earthquake", 8, Revelation::Medinan, 599),
    entry(100, "Al-'Adiyat", "The Courser", 11, Revelation::Meccan, 599),
    entry(101, "Al-Qari'ah", "The Calamity", 11, Revelation::Meccan, 600),
    entry(102, "At-Takathur", "The Rivalry in World Increase", 8, Revelation::Meccan, 600),
    entry(103, "Al-'Asr", "The Declining Day", 3, Revelation::Meccan, 601),
    entry(104, "Al-Humazah", "The Traducer", 9, Revelation::Meccan, 601),
    entry(105, "Al-Fil", "The Elephant", 5, Revelation::Meccan, 601),
    entry(106, "Quraysh", "Quraysh", 4, Revelation::Meccan, 602),
    entry(107, "Al-Ma'un", "The Small Kindnesses", 7, Revelation::Meccan, 602),
    entry(108, "Al-Kawthar", "The Abundance", 3, Revelation::Meccan, 602),
    entry(109, "Al-Kafirun", "The Disbelievers", 6, Revelation::Meccan, 603),
    entry(110, "An-Nasr", "The Divine Support", 3, Revelation::Medinan, 603),
    entry(111, "Al-Masad", "The Palm Fiber", 5, Revelation::Meccan, 603),
    entry(112, "Al-Ikhlas", "The Sincerity", 4, Revelation::Meccan, 604),
    entry(113, "Al-Falaq", "The Daybreak", 5, Revelation::Meccan, 604),
    entry(114, "An-Nas", "Mankind", 6, Revelation::Meccan, 604),
];

pub static PARAS: [Para; 30] = [
    juz(1, "Alif Lam Meem", "Alif Lam Meem", (1, 1), 1),
    juz(2, "Sayaqool", "The Fools Will Say", (2, 142), 22),
    juz(3, "Tilkal Rusul", "Those Messengers", (2, 253), 42),
    juz(4, "Lan Tana Lu", "You Will Never Attain", (3, 93), 62),
    juz(5, "Wal Mohsanat", "And the Chaste Women", (4, 24), 82),
    juz(6, "La Yuhibbullah", "Allah Does Not Like", (4, 148), 102),
    juz(7, "Wa Iza Samiu", "And When They Hear", (5, 82), 121),
    juz(8, "Wa Lau Annana", "And Even If We Had", (6, 111), 142),
    juz(9, "Qalal Malao", "The Eminent Ones Said", (7, 88), 162),
    juz(10, "Wa A'lamu", "And Know", (8, 41), 182),
    juz(11, "Yatazeroon", "They Will Make Excuses", (9, 93), 201),
    juz(12, "Wa Mamin Da'abat", "And There Is No Creature", (11, 6), 222),
    juz(13, "Wa Ma Ubrioo", "And I Do Not Acquit", (12, 53), 242),
    juz(14, "Rubama", "Perhaps", (15, 1), 262),
    juz(15, "Subhanallazi", "Exalted Is He", (17, 1), 282),
    juz(16, "Qal Alam", "He Said, Did I Not", (18, 75), 302),
    juz(17, "Aqtarabo", "Approached", (21, 1), 322),
    juz(18, "Qadd Aflaha", "Successful Indeed", (23, 1), 342),
    juz(19, "Wa Qalallazina", "And Those Who Said", (25, 21), 362),
    juz(20, "A'man Khalaq", "Who Created", (27, 56), 382),
    juz(21, "Utlu Ma Oohi", "Recite What Was Revealed", (29, 46), 402),
    juz(22, "Wa Manyaqnut", "And Whoever Is Obedient", (33, 31), 422),
    juz(23, "Wa Mali", "And Why Should I Not", (36, 28), 442),
    juz(24, "Faman Azlam", "Then Who Is More Unjust", (39, 32), 462),
    juz(25, "Elahe Yuruddo", "To Him Is Referred", (41, 47), 482),
    juz(26, "Ha'a Meem", "Ha Meem", (46, 1), 502),
    juz(27, "Qala Fama Khatbukum", "He Said, What Is Your Errand", (51, 31), 522),
    juz(28, "Qadd Sami Allah", "Allah Has Heard", (58, 1), 542),
    juz(29, "Tabarakallazi", "Blessed Is He", (67, 1), 562),
    juz(30, "Amma Yatasa'aloon", "About What Are They Asking", (78, 1), 582),
];

pub static RECITERS: [Reciter; 8] = [
    Reciter { id: 1, name: "Mishary Rashid Alafasy", subfolder: "Alafasy_128kbps" },
    Reciter { id: 2, name: "Abdul Basit Abdul Samad", subfolder: "Abdul_Basit_Murattal_192kbps" },
    Reciter { id: 3, name: "Mahmoud Khalil Al-Husary", subfolder: "Husary_128kbps" },
    Reciter { id: 4, name: "Mohamed Siddiq Al-Minshawi", subfolder: "Minshawy_Murattal_128kbps" },
    Reciter { id: 5, name: "Abdurrahmaan As-Sudais", subfolder: "Abdurrahmaan_As-Sudais_192kbps" },
    Reciter { id: 6, name: "Saud Ash-Shuraim", subfolder: "Saood_ash-Shuraym_128kbps" },
    Reciter { id: 7, name: "Maher Al-Muaiqly", subfolder: "MaherAlMuaiqly128kbps" },
    Reciter { id: 8, name: "Saad Al-Ghamdi", subfolder: "Ghamadi_40kbps" },
];

pub static HADITH_BOOKS: [HadithBook; 5] = [
    HadithBook { name: "Bukhari", value: "bukhari", limit: 7563 },
    HadithBook { name: "Muslim", value: "muslim", limit: 3032 },
    HadithBook { name: "Abu Dawud", value: "abudawud", limit: 3998 },
    HadithBook { name: "Ibn Majah", value: "ibnmajah", limit: 4342 },
    HadithBook { name: "Al-Tirmidhi", value: "tirmidhi", limit: 3956 },
];

pub fn chapter(number: u16) -> Option<&'static Chapter> {
    CHAPTERS.get(usize::from(number).checked_sub(1)?)
}

pub fn para(number: u8) -> Option<&'static Para> {
    PARAS.get(usize::from(number).checked_sub(1)?)
}

pub fn reciter(id: u32) -> Option<&'static Reciter> {
    RECITERS.iter().find(|r| r.id == id)
}

pub fn hadith_book(value: &str) -> Option<&'static HadithBook> {
    let wanted = normalize_name(value);
    HADITH_BOOKS
        .iter()
        .find(|b| b.value == wanted || normalize_name(b.name) == wanted)
}

/// Looks a chapter up by its transliterated or English name.
///
/// Matching ignores case, apostrophes, hyphens, spaces and a leading
/// article, so `baqarah`, `Al Baqarah` and `al-baqarah` all resolve.
pub fn chapter_by_name(name: &str) -> Option<&'static Chapter> {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }
    CHAPTERS.iter().find(|c| normalize_name(c.name) == wanted).or_else(|| {
        CHAPTERS
            .iter()
            .find(|c| normalize_name(c.english_name) == wanted)
    })
}

/// The para containing the given verse.
pub fn para_of(verse: VerseRef) -> Option<&'static Para> {
    PARAS.iter().rev().find(|p| p.start <= verse)
}

pub(crate) fn normalize_name(name: &str) -> String {
    let folded: String = name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    // "Al-", "An-", "Ash-"... are all the same article; compare without it.
    let lowered = name.trim().to_lowercase();
    let article = ["al-", "al ", "an-", "ar-", "as-", "ash-", "at-", "az-", "ad-", "adh-", "the "]
        .iter()
        .find(|a| lowered.starts_with(**a));
    match article {
        Some(a) => folded
            .get(a.chars().filter(|c| c.is_alphanumeric()).count()..)
            .unwrap_or(&folded)
            .to_string(),
        None => folded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_complete_and_ordered() {
        assert_eq!(CHAPTERS.len(), usize::from(CHAPTER_COUNT));
        assert_eq!(PARAS.len(), usize::from(PARA_COUNT));
        for (i, c) in CHAPTERS.iter().enumerate() {
            assert_eq!(usize::from(c.number), i + 1);
        }
        let total: u32 = CHAPTERS.iter().map(|c| c.verses).sum();
        assert_eq!(total, 6236);
    }

    #[test]
    fn name_lookup_is_forgiving() {
        assert_eq!(chapter_by_name("Al-Baqarah").map(|c| c.number), Some(2));
        assert_eq!(chapter_by_name("baqarah").map(|c| c.number), Some(2));
        assert_eq!(chapter_by_name("al baqarah").map(|c| c.number), Some(2));
        assert_eq!(chapter_by_name("Ali 'Imran").map(|c| c.number), Some(3));
        assert_eq!(chapter_by_name("The Cow").map(|c| c.number), Some(2));
        assert_eq!(chapter_by_name("Ya-Sin").map(|c| c.number), Some(36));
        assert!(chapter_by_name("").is_none());
        assert!(chapter_by_name("Nonexistent").is_none());
    }

    #[test]
    fn page_spans() {
        assert_eq!(chapter(1).map(|c| c.total_pages()), Some(1));
        assert_eq!(chapter(2).map(|c| (c.start_page, c.end_page())), Some((2, 49)));
        assert_eq!(chapter(114).map(|c| c.end_page()), Some(MUSHAF_PAGES));
        assert_eq!(para(1).map(|p| p.total_pages()), Some(21));
        assert_eq!(para(30).map(|p| p.page_range()), Some("582 - 604".to_string()));
    }

    #[test]
    fn para_ranges() {
        let second = para(2).unwrap();
        assert_eq!(second.verses_range(), "2:142 - 2:252");
        // Para 14 starts at 15:1, so para 13 ends on the last verse of chapter 14.
        assert_eq!(para(13).unwrap().end(), VerseRef { chapter: 14, verse: 52 });
        assert_eq!(para_of(VerseRef { chapter: 2, verse: 255 }).map(|p| p.number), Some(3));
        assert_eq!(para_of(VerseRef { chapter: 114, verse: 6 }).map(|p| p.number), Some(30));
    }

    #[test]
    fn lookups_reject_out_of_range() {
        assert!(chapter(0).is_none());
        assert!(chapter(115).is_none());
        assert!(para(0).is_none());
        assert!(reciter(99).is_none());
        assert_eq!(reciter(1).map(|r| r.subfolder), Some("Alafasy_128kbps"));
        assert_eq!(hadith_book("Abu Dawud").map(|b| b.value), Some("abudawud"));
        assert_eq!(hadith_book("bukhari").map(|b| b.limit), Some(7563));
    }
}
