use chess_explorer::dashboard::{Dashboard, DEFAULT_TOP_OPENINGS, SELECT_ALL};
use chess_explorer::{derive, read_games_file, ExplorerError, SkillLevel, TimeControl, Winner};
use std::fs;

const GAMES_CSV: &str = "\
id,rated,created_at,last_move_at,turns,victory_status,winner,increment_code,white_id,white_rating,black_id,black_rating,moves,opening_eco,opening_name,opening_ply
TZJHLljE,FALSE,1.50421E+12,1.50421E+12,13,outoftime,white,15+2,bourgris,1500,a-00,1191,d4 d5 c4 c6 cxd5 e6 dxe6 fxe6 Nf3 Bb4+ Nc3 Ba5 Bf4,D10,Slav Defense: Exchange Variation,5
l1NXvwaE,TRUE,1.50413E+12,1.50413E+12,16,resign,black,5+10,a-00,1322,skinnerua,1261,d4 Nc6 e4 e5 f4 f6 dxe5 fxe5 fxe5 Nxe5 Qd4 Nc6 Qe5+ Nxe5 c4 Bb4+,B00,Nimzowitsch Defense: Kennedy Variation,4
mIICvQHh,TRUE,1.50413E+12,1.50413E+12,61,mate,white,5+10,ischia,1496,a-00,1500,e4 e5 d3 d6 Be3 c6 Be2 b5 Nd2 a5,C20,King's Pawn Game: Leonardis Variation,3
kWKvrqYL,TRUE,1.50411E+12,1.50411E+12,61,mate,white,20+0,daniamurashov,1439,adivanov2009,1454,d4 d5 Nf3 Bf5 Nc3 Nf6 Bf4 Ng4 e3 Nc6,D02,Queen's Pawn Game: Zukertort Variation,3
kWKvrqYL,TRUE,1.50411E+12,1.50411E+12,61,mate,white,20+0,daniamurashov,1439,adivanov2009,1454,d4 d5 Nf3 Bf5 Nc3 Nf6 Bf4 Ng4 e3 Nc6,D02,Queen's Pawn Game: Zukertort Variation,3
9tXo1AUZ,TRUE,1.50403E+12,1.50403E+12,95,mate,white,30+3,nik221107,1523,adivanov2009,1469,e4 e5,C41,Philidor Defense,5
MsoDV9wj,FALSE,1.50424E+12,1.50424E+12,5,draw,draw,10+0,trelynn17,1250,franklin14532,1002,e4 c5 Nf3 Qa5 a3,B27,Sicilian Defense: Mongoose Variation,4
qwU9rasv,TRUE,1.50423E+12,1.50423E+12,33,resign,white,2+5,capa_jr,1520,daniel_likes_chess,1423,d4 d5 e4 dxe4,D00,Blackmar-Diemer Gambit,6
RVN0N3VK,FALSE,1.50422E+12,1.50422E+12,9,resign,black,8+0,daniel_likes_chess,1413,soultego,2108,e4 Nc6 d4 e5 d5 Nce7 c3 Ng6 b4,B00,Nimzowitsch Defense: Kennedy Variation |  Linksspringer Variation,5
";

fn write_games(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.csv");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_load_dedup_and_derive() {
    let (_dir, path) = write_games(GAMES_CSV);
    let table = read_games_file(&path).unwrap();
    assert_eq!(table.len(), 8);
    assert_eq!(table.duplicates_dropped, 1);

    let derived = derive(table).unwrap();
    let first = &derived.games[0];
    assert_eq!(first.features.rating_difference, 309);
    assert_eq!(first.features.avg_rating, 1345.5);
    assert_eq!(first.features.opening, "Slav Defense");
    assert_eq!(first.features.skill_level, SkillLevel::Beginner);
    assert_eq!(first.features.time_control, TimeControl::Rapid);

    let speeds: Vec<_> = derived.iter().map(|g| g.features.time_control).collect();
    assert_eq!(
        speeds,
        [
            TimeControl::Rapid,
            TimeControl::Blitz,
            TimeControl::Blitz,
            TimeControl::Rapid,
            TimeControl::Classic,
            TimeControl::Rapid,
            TimeControl::Bullet,
            TimeControl::Blitz,
        ]
    );

    // Passthrough columns are kept verbatim
    assert_eq!(first.row.raw.get(12), Some("d4 d5 c4 c6 cxd5 e6 dxe6 fxe6 Nf3 Bb4+ Nc3 Ba5 Bf4"));
}

#[test]
fn test_derived_csv_round_trip() {
    let (dir, path) = write_games(GAMES_CSV);
    let derived = derive(read_games_file(&path).unwrap()).unwrap();

    let out = dir.path().join("derived.csv");
    derived.write_csv_file(&out).unwrap();

    let reloaded = read_games_file(&out).unwrap();
    assert_eq!(reloaded.headers.len(), 16 + 5);
    assert_eq!(reloaded.duplicates_dropped, 0);

    let again = derive(reloaded).unwrap();
    assert_eq!(again.output_headers().len(), 21);
    for (a, b) in derived.iter().zip(again.iter()) {
        assert_eq!(a.features, b.features);
    }
}

#[test]
fn test_malformed_increment_fails_session() {
    let broken = GAMES_CSV.replace("20+0", "twenty+0");
    let (_dir, path) = write_games(&broken);

    let err = derive(read_games_file(&path).unwrap()).unwrap_err();
    assert!(err.is_parse());
    assert!(matches!(err, ExplorerError::Row { row: 4, .. }));
}

#[test]
fn test_error_row_is_source_row() {
    // The duplicate game sits before the broken one
    let broken = GAMES_CSV.replace("8+0", "eight+0");
    let (_dir, path) = write_games(&broken);

    let err = derive(read_games_file(&path).unwrap()).unwrap_err();
    assert!(matches!(err, ExplorerError::Row { row: 9, .. }));
}

#[test]
fn test_dashboard_views() {
    let (_dir, path) = write_games(GAMES_CSV);
    let derived = derive(read_games_file(&path).unwrap()).unwrap();
    let dashboard = Dashboard::new(&derived, DEFAULT_TOP_OPENINGS);

    let openings = dashboard.opening_options();
    assert_eq!(openings.values[0], "Nimzowitsch Defense");
    assert_eq!(openings.options().last(), Some(&SELECT_ALL));

    let filters = dashboard
        .filters(true, Some("Nimzowitsch Defense"), Some(SELECT_ALL))
        .unwrap();
    let views = dashboard.render(&filters);

    assert_eq!(views.turns_vs_rating.points.len(), 8);
    // Rated games only, every one of them binned
    assert_eq!(views.rating_differential.histogram.total(), 5);
    assert_eq!(views.winner_frequency.games, 2);
    assert_eq!(views.winner_frequency.counts[1], (Winner::Black, 2));

    assert!(dashboard.filters(false, Some("Ruy Lopez"), None).is_err());
}
